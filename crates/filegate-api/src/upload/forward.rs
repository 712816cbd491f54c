use crate::upload::consumer::StreamForwarder;
use crate::upload::extractor::FileUpload;
use filegate_core::AppError;
use filegate_storage::BlobStore;
use std::time::Instant;
use tokio::io::AsyncRead;

/// Result of a committed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedUpload {
    pub object_key: String,
    pub bytes: u64,
}

/// Stream an upload into a new object.
///
/// The write stream is committed only when every chunk was accepted; on any
/// failure it is aborted, so no truncated object is ever left in the bucket.
pub async fn forward_upload<R>(
    upload: &mut FileUpload<R>,
    store: &dyn BlobStore,
) -> Result<ForwardedUpload, AppError>
where
    R: AsyncRead + Unpin + Send,
{
    let start = Instant::now();
    let stream = store
        .open_write_stream(upload.file_name())
        .await
        .map_err(AppError::from)?;
    let mut forwarder = StreamForwarder::new(stream);

    match upload.process(&mut forwarder).await {
        Ok(bytes) => {
            let object_key = forwarder.close().await.map_err(AppError::from)?;
            tracing::info!(
                bucket = %store.bucket(),
                key = %object_key,
                size_bytes = bytes,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Upload stored"
            );
            Ok(ForwardedUpload { object_key, bytes })
        }
        Err(err) => {
            let key = forwarder.key().to_string();
            if let Err(abort_err) = forwarder.abort().await {
                tracing::warn!(
                    error = %abort_err,
                    bucket = %store.bucket(),
                    key = %key,
                    "Failed to abort write stream"
                );
            }
            Err(err.into())
        }
    }
}
