use crate::gateway::{ObjectStoreGateway, UrlSigning};
use crate::signer::HmacUrlSigner;
use crate::traits::{StorageError, StorageResult};
use crate::StorageBackend;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use std::path::PathBuf;
use std::sync::Arc;

/// Build a gateway over a local directory.
///
/// The directory is created if missing and acts as the bucket root; the
/// bucket name reported is the directory path.
pub(crate) async fn local_gateway(
    base_path: impl Into<PathBuf>,
    signer: Arc<HmacUrlSigner>,
) -> StorageResult<ObjectStoreGateway> {
    let base_path = base_path.into();

    tokio::fs::create_dir_all(&base_path).await.map_err(|e| {
        StorageError::ConfigError(format!(
            "Failed to create storage directory {}: {}",
            base_path.display(),
            e
        ))
    })?;

    let store = LocalFileSystem::new_with_prefix(&base_path)
        .map_err(|e| StorageError::ConfigError(e.to_string()))?;

    let bucket = base_path.display().to_string();
    tracing::info!(bucket = %bucket, "Local storage initialized");

    Ok(ObjectStoreGateway::new(
        Arc::new(store),
        bucket,
        StorageBackend::Local,
        UrlSigning::Hmac(signer),
    ))
}

/// Build a process-local in-memory gateway.
pub(crate) fn memory_gateway(signer: Arc<HmacUrlSigner>) -> ObjectStoreGateway {
    tracing::info!("In-memory storage initialized");

    ObjectStoreGateway::new(
        Arc::new(InMemory::new()),
        "memory",
        StorageBackend::Memory,
        UrlSigning::Hmac(signer),
    )
}
