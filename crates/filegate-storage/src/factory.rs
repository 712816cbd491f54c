use crate::gateway::ObjectStoreGateway;
use crate::gcs::gcs_gateway;
use crate::local::{local_gateway, memory_gateway};
use crate::s3::s3_gateway;
use crate::signer::HmacUrlSigner;
use crate::{StorageBackend, StorageError, StorageResult};
use filegate_core::Config;
use std::sync::Arc;

/// Create the blob store gateway selected by configuration.
pub async fn create_blob_store(config: &Config) -> StorageResult<ObjectStoreGateway> {
    match config.storage_backend() {
        StorageBackend::Gcs => {
            let bucket = required_bucket(config)?;
            gcs_gateway(bucket)
        }

        StorageBackend::S3 => {
            let bucket = required_bucket(config)?;
            let region = config
                .s3_region()
                .or_else(|| config.aws_region())
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
                })?;
            let endpoint = config.s3_endpoint().map(String::from);

            s3_gateway(bucket, region, endpoint)
        }

        StorageBackend::Local => {
            let base_path = config.local_storage_path().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;

            local_gateway(base_path, hmac_signer(config)).await
        }

        StorageBackend::Memory => Ok(memory_gateway(hmac_signer(config))),
    }
}

fn required_bucket(config: &Config) -> StorageResult<String> {
    config
        .bucket()
        .map(String::from)
        .ok_or_else(|| StorageError::ConfigError("STORAGE_BUCKET not configured".to_string()))
}

fn hmac_signer(config: &Config) -> Arc<HmacUrlSigner> {
    let signer = match config.url_signing_secret() {
        Some(secret) => HmacUrlSigner::new(secret.as_bytes().to_vec(), config.public_base_url()),
        None => {
            tracing::warn!(
                "URL_SIGNING_SECRET not set, signed URLs will not survive a restart"
            );
            HmacUrlSigner::with_random_secret(config.public_base_url())
        }
    };
    Arc::new(signer)
}
