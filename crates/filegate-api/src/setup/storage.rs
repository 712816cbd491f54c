//! Storage setup and initialization

use anyhow::Result;
use filegate_core::Config;
use filegate_storage::{create_blob_store, BlobStore, HmacUrlSigner};
use std::sync::Arc;

/// Build the blob store gateway; also return the HMAC signer when the backend
/// signs URLs locally.
pub async fn setup_storage(
    config: &Config,
) -> Result<(Arc<dyn BlobStore>, Option<Arc<HmacUrlSigner>>)> {
    tracing::info!("Initializing blob store gateway...");
    let gateway = create_blob_store(config).await?;
    let url_signer = gateway.hmac_signer();

    tracing::info!(
        backend = %gateway.backend_type(),
        bucket = %gateway.bucket(),
        local_signing = url_signer.is_some(),
        "Blob store gateway initialized"
    );

    Ok((Arc::new(gateway), url_signer))
}
