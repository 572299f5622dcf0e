//! Panic containment at the outer edge of the pipeline.
//!
//! A panic anywhere inside becomes a fixed 500 `{"code":500,"message":"internal server error"}`
//! and the connection task survives, so the next request is served normally.
//! Location and backtrace are logged by the process panic hook (see `app::init_panic_hook`).

use std::any::Any;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::ErrorBody;

pub const PANIC_MESSAGE: &str = "internal server error";

pub fn apply(router: Router) -> Router {
    router.layer(CatchPanicLayer::custom(panic_response))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };

    tracing::error!(panic = %detail, "recovered from panic while serving request");

    let status = StatusCode::INTERNAL_SERVER_ERROR;
    (status, Json(ErrorBody::new(status, PANIC_MESSAGE))).into_response()
}
