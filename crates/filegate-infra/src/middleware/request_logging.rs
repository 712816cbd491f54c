use super::request_id::get_request_id;
use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Log one line per request: method, URI, status and latency.
///
/// Successful responses log at `info`; any status of 400 or above logs at
/// `error`. Runs inside [`request_id_middleware`](super::request_id_middleware)
/// so the id is available.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = get_request_id(&request).unwrap_or_default();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    if status >= 400 {
        tracing::error!(
            %request_id,
            %method,
            %uri,
            status,
            duration_ms,
            "Request failed"
        );
    } else {
        tracing::info!(
            %request_id,
            %method,
            %uri,
            status,
            duration_ms,
            "Request completed"
        );
    }

    response
}
