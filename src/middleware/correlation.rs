/*
 * Responsibility
 * - Correlation id per request (X-Correlation-ID)
 *   - a non-empty inbound header is echoed byte-for-byte, otherwise a ULID is generated
 * - Seeds RequestContext in request extensions (non-UTF-8 bytes decoded lossily)
 * - Echoes the id on the response
 */
use axum::{
    Router,
    extract::Request,
    http::HeaderValue,
    middleware::{self, Next},
    response::Response,
};

use crate::context::{CorrelationId, RequestContext};

pub const CORRELATION_HEADER: &str = "x-correlation-id";

pub fn apply(router: Router) -> Router {
    router.layer(middleware::from_fn(assign_correlation_id))
}

async fn assign_correlation_id(mut req: Request, next: Next) -> Response {
    let inbound = req
        .headers()
        .get(CORRELATION_HEADER)
        .filter(|v| !v.is_empty())
        .cloned();

    let (id, header) = match inbound {
        Some(value) => {
            let id = CorrelationId::from(String::from_utf8_lossy(value.as_bytes()).into_owned());
            (id, Some(value))
        }
        None => {
            let id = CorrelationId::generate();
            let header = HeaderValue::from_str(id.as_str()).ok();
            (id, header)
        }
    };

    req.extensions_mut().insert(RequestContext::new(id));

    let mut res = next.run(req).await;
    if let Some(value) = header {
        res.headers_mut().insert(CORRELATION_HEADER, value);
    }
    res
}
