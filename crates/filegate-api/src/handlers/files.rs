//! Upload and download-URL handlers for `/files` and `/videos`.
//!
//! Both resources behave identically; they differ only in the multipart field
//! name carrying the file.

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::upload::{forward_upload, DiscardConsumer, FileUpload};
use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};
use filegate_core::constants::{FILE_FIELD_NAME, VIDEO_FIELD_NAME};
use filegate_infra::ErrorResponse;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignedUrlResponse {
    /// Signed GET URL, valid for the configured TTL.
    pub url: String,
}

#[utoipa::path(
    post,
    path = "/files",
    tag = "files",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Form field `file` carries the upload"),
    responses(
        (status = 201, description = "File stored"),
        (status = 500, description = "Upload failed", body = ErrorResponse)
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<StatusCode, HttpAppError> {
    handle_upload(&state, request, FILE_FIELD_NAME).await
}

#[utoipa::path(
    post,
    path = "/videos",
    tag = "videos",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Form field `video` carries the upload"),
    responses(
        (status = 201, description = "Video stored"),
        (status = 500, description = "Upload failed", body = ErrorResponse)
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<StatusCode, HttpAppError> {
    handle_upload(&state, request, VIDEO_FIELD_NAME).await
}

#[utoipa::path(
    get,
    path = "/files/{file_name}",
    tag = "files",
    params(("file_name" = String, Path, description = "Stored object key")),
    responses(
        (status = 200, description = "Signed download URL", body = SignedUrlResponse),
        (status = 500, description = "Signing failed", body = ErrorResponse)
    )
)]
pub async fn get_file_url(
    State(state): State<Arc<AppState>>,
    Path(file_name): Path<String>,
) -> Result<Json<SignedUrlResponse>, HttpAppError> {
    signed_url(&state, &file_name).await
}

#[utoipa::path(
    get,
    path = "/videos/{file_name}",
    tag = "videos",
    params(("file_name" = String, Path, description = "Stored object key")),
    responses(
        (status = 200, description = "Signed download URL", body = SignedUrlResponse),
        (status = 500, description = "Signing failed", body = ErrorResponse)
    )
)]
pub async fn get_video_url(
    State(state): State<Arc<AppState>>,
    Path(file_name): Path<String>,
) -> Result<Json<SignedUrlResponse>, HttpAppError> {
    signed_url(&state, &file_name).await
}

async fn handle_upload(
    state: &AppState,
    request: Request,
    field_name: &str,
) -> Result<StatusCode, HttpAppError> {
    let max_size = state.config.max_upload_size_bytes();
    let mut upload = FileUpload::from_request(request, field_name, max_size).await?;

    if state.config.upload_forwarding_enabled() {
        forward_upload(&mut upload, state.store.as_ref()).await?;
    } else {
        let mut discard = DiscardConsumer::default();
        let bytes = upload.process(&mut discard).await?;
        tracing::debug!(
            file_name = %upload.file_name(),
            size_bytes = bytes,
            "Upload forwarding disabled, bytes discarded"
        );
    }

    Ok(StatusCode::CREATED)
}

async fn signed_url(
    state: &AppState,
    object_key: &str,
) -> Result<Json<SignedUrlResponse>, HttpAppError> {
    let url = state
        .store
        .signed_url(object_key, state.config.signed_url_ttl())
        .await?;

    Ok(Json(SignedUrlResponse { url }))
}
