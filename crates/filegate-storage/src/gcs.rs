use crate::gateway::{ObjectStoreGateway, UrlSigning};
use crate::traits::{StorageError, StorageResult};
use crate::StorageBackend;
use object_store::gcp::GoogleCloudStorageBuilder;
use std::sync::Arc;

/// Build a Google Cloud Storage gateway bound to `bucket`.
///
/// Credentials are resolved from `GOOGLE_SERVICE_ACCOUNT`,
/// `GOOGLE_APPLICATION_CREDENTIALS` or the metadata server, in that order.
pub(crate) fn gcs_gateway(bucket: String) -> StorageResult<ObjectStoreGateway> {
    let store = Arc::new(
        GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket.clone())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?,
    );

    tracing::info!(bucket = %bucket, "GCS storage initialized");

    Ok(ObjectStoreGateway::new(
        store.clone(),
        bucket,
        StorageBackend::Gcs,
        UrlSigning::Provider(store),
    ))
}
