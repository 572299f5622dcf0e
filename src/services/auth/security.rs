//! Per-request security gate: token -> claims -> role check -> enriched context.

use std::sync::Arc;

use tracing::warn;

use crate::context::RequestContext;
use crate::error::AppError;
use crate::services::auth::policy::{AuthorizationPolicy, Operation};
use crate::services::auth::token::TokenService;

#[derive(Debug, Clone)]
pub struct SecurityHandler {
    tokens: Arc<TokenService>,
    policy: AuthorizationPolicy,
}

impl SecurityHandler {
    pub fn new(tokens: Arc<TokenService>, policy: AuthorizationPolicy) -> Self {
        Self { tokens, policy }
    }

    /// Validate `raw_token` for `operation` and return `ctx` with the caller's claims attached.
    ///
    /// - empty or invalid token: `InvalidToken`
    /// - elevated operation without the admin role: `Forbidden`
    pub fn authenticate(
        &self,
        ctx: &RequestContext,
        operation: Operation,
        raw_token: &str,
    ) -> Result<RequestContext, AppError> {
        if raw_token.is_empty() {
            return Err(AppError::InvalidToken);
        }

        let claims = self.tokens.parse_token(raw_token)?;

        if self.policy.requires_admin(operation) && !claims.is_admin() {
            warn!(
                operation = operation.name(),
                user_id = claims.user_id(),
                role = claims.role(),
                correlation_id = ctx.correlation_id().unwrap_or_default(),
                "admin role required"
            );
            return Err(AppError::Forbidden);
        }

        Ok(ctx.with_claims(claims))
    }
}
