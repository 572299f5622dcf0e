/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - security gate が RequestContext に claims を載せ、handler はこの型だけを受け取る
 */
use crate::context::RequestContext;

/// Caller identity for a request that passed the security gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: i64,
    pub role: String,
    pub correlation_id: Option<String>,
}

impl AuthCtx {
    /// `None` when the context carries no claims.
    pub fn from_context(ctx: &RequestContext) -> Option<Self> {
        let claims = ctx.claims()?;
        Some(Self {
            user_id: claims.user_id(),
            role: claims.role().to_owned(),
            correlation_id: ctx.correlation_id().map(str::to_owned),
        })
    }
}
