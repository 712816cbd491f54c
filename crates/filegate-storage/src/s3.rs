use crate::gateway::{ObjectStoreGateway, UrlSigning};
use crate::traits::{StorageError, StorageResult};
use crate::StorageBackend;
use object_store::aws::AmazonS3Builder;
use std::sync::Arc;

/// Build an S3 gateway bound to `bucket`.
///
/// Credentials come from the usual AWS environment variables. `endpoint_url`
/// targets S3-compatible providers (e.g. "http://localhost:9000" for MinIO);
/// plain-http endpoints are allowed only when explicitly configured.
pub(crate) fn s3_gateway(
    bucket: String,
    region: String,
    endpoint_url: Option<String>,
) -> StorageResult<ObjectStoreGateway> {
    let mut builder = AmazonS3Builder::from_env()
        .with_region(region.clone())
        .with_bucket_name(bucket.clone());

    if let Some(ref endpoint) = endpoint_url {
        let allow_http = endpoint.starts_with("http://");
        builder = builder
            .with_endpoint(endpoint.clone())
            .with_allow_http(allow_http);
    }

    let store = Arc::new(
        builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?,
    );

    tracing::info!(
        bucket = %bucket,
        region = %region,
        endpoint = ?endpoint_url,
        "S3 storage initialized"
    );

    Ok(ObjectStoreGateway::new(
        store.clone(),
        bucket,
        StorageBackend::S3,
        UrlSigning::Provider(store),
    ))
}
