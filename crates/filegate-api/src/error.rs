//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`; anything convertible into
//! [`AppError`] converts with `?`. The response carries the typed status from
//! [`ErrorMetadata`]; routes wrapped in [`error_status_middleware`] get the
//! status chosen by [`AppError::status_code`] for the configured mode.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use filegate_core::{AppError, ErrorMetadata, ErrorStatusMode, LogLevel};
use filegate_infra::ErrorResponse;
use std::sync::Arc;

use crate::upload::UploadError;

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: `AppError` lives in filegate-core).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<UploadError> for HttpAppError {
    fn from(err: UploadError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<filegate_storage::StorageError> for HttpAppError {
    fn from(err: filegate_storage::StorageError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

/// The [`AppError`] a response was rendered from, kept in its extensions.
#[derive(Debug, Clone)]
pub struct RenderedAppError(pub Arc<AppError>);

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let error_code = error.error_code();
    let details = error.detailed_message();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %details, error_type, error_code, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %details, error_type, error_code, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %details, error_type, error_code, "Error occurred");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&app_error);

        let mut response =
            (status, Json(ErrorResponse::new(app_error.client_message()))).into_response();
        response
            .extensions_mut()
            .insert(RenderedAppError(Arc::new(app_error)));
        response
    }
}

/// Apply the configured [`ErrorStatusMode`] to error responses.
pub async fn error_status_middleware(
    State(mode): State<ErrorStatusMode>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let status = response
        .extensions()
        .get::<RenderedAppError>()
        .map(|RenderedAppError(err)| err.status_code(mode));
    if let Some(status) = status {
        *response.status_mut() =
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    }

    response
}
