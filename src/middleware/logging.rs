//! Access log: one event per completed request.
//!
//! Runs outside the correlation stage, so the id is read back from the
//! response header rather than from request extensions.

use std::time::Instant;

use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
};
use tracing::Level;

use crate::middleware::correlation::CORRELATION_HEADER;

pub fn apply(router: Router) -> Router {
    router.layer(middleware::from_fn(log_request))
}

/// 5xx is an error, everything else (4xx included) is routine.
pub fn level_for(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else {
        Level::INFO
    }
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let res = next.run(req).await;

    let status = res.status();
    let duration_ms = started.elapsed().as_millis() as u64;
    let correlation_id = res
        .headers()
        .get(CORRELATION_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default();
    let correlation_id = correlation_id.as_str();

    if level_for(status) == Level::ERROR {
        tracing::error!(
            %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            correlation_id,
            "request failed"
        );
    } else {
        tracing::info!(
            %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            correlation_id,
            "request completed"
        );
    }

    res
}
