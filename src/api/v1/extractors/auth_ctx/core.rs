use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::context::RequestContext;
use crate::error::AppError;

use super::AuthCtx;

/// Handler で AuthCtx を受け取るための extractor
/// security gate が claims 付きの RequestContext を extensions に insert 済みである前提
/// 見つからない場合は 401 を返す（gate が掛かっていない route など）
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .and_then(AuthCtx::from_context)
            .map(AuthCtxExtractor)
            .ok_or(AppError::Unauthorized)
    }
}
