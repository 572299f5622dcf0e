//! access token (cookie) check -> claims attached to RequestContext in extensions
//!
//! Applied per route with `route_layer`, so each gate knows which operation it guards
//! and unmatched methods never reach it.
//!
//! ```ignore
//! .route("/pets/{id}", secured(get(find_pet_by_id), &state, Operation::FindPetById))
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};
use axum_extra::extract::CookieJar;

use crate::context::RequestContext;
use crate::error::AppError;
use crate::services::auth::{Operation, SecurityHandler};
use crate::state::AppState;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

#[derive(Clone)]
pub struct SecurityGate {
    security: Arc<SecurityHandler>,
    operation: Operation,
}

/// Guard `route` with the token check for `operation`. Public operations are returned as-is.
pub fn secured(
    route: MethodRouter<AppState>,
    state: &AppState,
    operation: Operation,
) -> MethodRouter<AppState> {
    if !operation.requires_token() {
        return route;
    }

    let gate = SecurityGate {
        security: state.security.clone(),
        operation,
    };
    route.route_layer(middleware::from_fn_with_state(gate, require_token))
}

async fn require_token(
    State(gate): State<SecurityGate>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // A missing cookie is treated as an empty token.
    let token = jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
        .unwrap_or_default();

    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();

    let ctx = match gate.security.authenticate(&ctx, gate.operation, &token) {
        Ok(ctx) => ctx,
        Err(err) => {
            tracing::debug!(
                operation = gate.operation.name(),
                correlation_id = ctx.correlation_id().unwrap_or_default(),
                error = %err,
                "request rejected by security gate"
            );
            return Err(err);
        }
    };

    // middleware -> extractor handoff
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
