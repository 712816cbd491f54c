//! [`BlobStore`] implementation shared by every backend.

use crate::keys::{generate_object_key, object_path};
use crate::signer::HmacUrlSigner;
use crate::traits::{BlobStore, ByteStream, StorageError, StorageResult, WriteStream};
use crate::write_stream::ObjectWriteStream;
use crate::StorageBackend;
use async_trait::async_trait;
use futures::StreamExt;
use http::Method;
use object_store::signer::Signer;
use object_store::{ObjectStore, ObjectStoreExt, WriteMultipart};
use std::sync::Arc;
use std::time::Duration;

/// How download URLs are produced.
#[derive(Clone)]
pub enum UrlSigning {
    /// The cloud provider's own presigning (GCS V4, S3 SigV4).
    Provider(Arc<dyn Signer>),
    /// HMAC URLs served back by this process.
    Hmac(Arc<HmacUrlSigner>),
}

/// Gateway over a bucket-scoped `object_store` client.
#[derive(Clone)]
pub struct ObjectStoreGateway {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    backend: StorageBackend,
    signing: UrlSigning,
}

impl ObjectStoreGateway {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        backend: StorageBackend,
        signing: UrlSigning,
    ) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            backend,
            signing,
        }
    }

    /// Underlying store client.
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// The HMAC signer, when this gateway signs locally.
    pub fn hmac_signer(&self) -> Option<Arc<HmacUrlSigner>> {
        match &self.signing {
            UrlSigning::Hmac(signer) => Some(signer.clone()),
            UrlSigning::Provider(_) => None,
        }
    }
}

#[async_trait]
impl BlobStore for ObjectStoreGateway {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        self.backend
    }

    async fn open_write_stream(&self, desired_name: &str) -> StorageResult<Box<dyn WriteStream>> {
        let key = generate_object_key(desired_name);
        let location = object_path(&key)?;

        let upload = self.store.put_multipart(&location).await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                "Failed to open write stream"
            );
            StorageError::from(e)
        })?;

        tracing::debug!(bucket = %self.bucket, key = %key, "Write stream opened");

        Ok(Box::new(ObjectWriteStream::new(
            key,
            self.bucket.clone(),
            WriteMultipart::new(upload),
        )))
    }

    async fn signed_url(&self, object_key: &str, expires_in: Duration) -> StorageResult<String> {
        match &self.signing {
            UrlSigning::Provider(signer) => {
                let location = object_path(object_key)?;
                let url = signer
                    .signed_url(Method::GET, &location, expires_in)
                    .await
                    .map_err(|e| {
                        tracing::error!(
                            error = %e,
                            bucket = %self.bucket,
                            key = %object_key,
                            "URL signing failed"
                        );
                        StorageError::from(e)
                    })?;
                Ok(url.to_string())
            }
            UrlSigning::Hmac(signer) => {
                object_path(object_key)?;
                Ok(signer.sign(object_key, expires_in))
            }
        }
    }

    async fn download_stream(&self, object_key: &str) -> StorageResult<ByteStream> {
        let location = object_path(object_key)?;

        let result = self.store.get(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StorageError::NotFound(object_key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %object_key,
                    "Download failed"
                );
                StorageError::from(other)
            }
        })?;

        Ok(Box::pin(result.into_stream().map(|chunk| chunk.map_err(StorageError::from))))
    }
}
