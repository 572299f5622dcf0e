//! HTTP-level limits applied to every route, inside the pipeline.
//!
//! - Body limit: 1 MiB, enforced while the body extractor buffers it. Oversized bodies
//!   surface as `AppError::PayloadTooLarge` (413, JSON error body) whether or not the
//!   request declares a Content-Length.
use axum::{Router, extract::DefaultBodyLimit};

pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn apply(router: Router) -> Router {
    router.layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
