//! Serves HMAC-signed download URLs for the local and in-memory backends.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use filegate_core::AppError;
use filegate_infra::ErrorResponse;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SignedQuery {
    pub expires: Option<String>,
    pub signature: Option<String>,
}

#[utoipa::path(
    get,
    path = "/signed/{object_key}",
    tag = "files",
    params(
        ("object_key" = String, Path, description = "Stored object key"),
        ("expires" = u64, Query, description = "Expiry as unix seconds"),
        ("signature" = String, Query, description = "Hex HMAC-SHA256 signature")
    ),
    responses(
        (status = 200, description = "Object bytes"),
        (status = 403, description = "Invalid or expired signature", body = ErrorResponse),
        (status = 404, description = "Object not found", body = ErrorResponse)
    )
)]
pub async fn download_signed(
    State(state): State<Arc<AppState>>,
    Path(object_key): Path<String>,
    Query(query): Query<SignedQuery>,
) -> Result<Response, HttpAppError> {
    let signer = state
        .url_signer
        .as_ref()
        .ok_or_else(|| AppError::NotFound(object_key.clone()))?;

    let (Some(expires), Some(signature)) = (
        query.expires.and_then(|e| e.parse::<u64>().ok()),
        query.signature,
    ) else {
        return Err(AppError::Forbidden("missing or malformed signature".to_string()).into());
    };

    signer.verify(&object_key, expires, &signature)?;

    let stream = state.store.download_stream(&object_key).await?;

    tracing::debug!(key = %object_key, "Serving signed download");

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        Body::from_stream(stream),
    )
        .into_response())
}
