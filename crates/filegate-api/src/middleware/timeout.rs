use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use filegate_core::AppError;
use std::time::Duration;

/// Fail a request that has not produced a response within `deadline`.
///
/// The handler future is dropped on expiry, which aborts any write stream it
/// still holds. The failure is rendered like every other [`AppError`].
pub async fn request_timeout_middleware(
    State(deadline): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let outcome = tokio::time::timeout(deadline, next.run(request)).await;
    match outcome {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(
                %method,
                %uri,
                timeout_secs = deadline.as_secs(),
                "Request timed out"
            );
            HttpAppError(AppError::RequestTimeout(deadline.as_secs())).into_response()
        }
    }
}
