//! Append-only write stream over an object store multipart upload.

use crate::traits::{StorageError, StorageResult, WriteStream, WriteStreamState};
use async_trait::async_trait;
use object_store::WriteMultipart;
use std::time::Instant;

/// In-flight part uploads allowed before `write` starts waiting.
const MAX_IN_FLIGHT_PARTS: usize = 8;

/// [`WriteStream`] backed by an `object_store` [`WriteMultipart`].
///
/// Nothing is visible in the bucket until [`close`](WriteStream::close)
/// completes the upload. If the stream is dropped while still opened the
/// pending upload is aborted on the current runtime.
pub struct ObjectWriteStream {
    key: String,
    bucket: String,
    writer: Option<WriteMultipart>,
    bytes_written: u64,
    started: Instant,
}

impl ObjectWriteStream {
    pub fn new(key: String, bucket: String, writer: WriteMultipart) -> Self {
        Self {
            key,
            bucket,
            writer: Some(writer),
            bytes_written: 0,
            started: Instant::now(),
        }
    }

    /// Total bytes accepted so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn take_writer(&mut self) -> StorageResult<WriteMultipart> {
        self.writer
            .take()
            .ok_or_else(|| StorageError::StreamClosed(self.key.clone()))
    }
}

#[async_trait]
impl WriteStream for ObjectWriteStream {
    fn key(&self) -> &str {
        &self.key
    }

    fn state(&self) -> WriteStreamState {
        if self.writer.is_some() {
            WriteStreamState::Opened
        } else {
            WriteStreamState::Closed
        }
    }

    async fn write(&mut self, chunk: &[u8]) -> StorageResult<usize> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| StorageError::StreamClosed(self.key.clone()))?;

        writer.wait_for_capacity(MAX_IN_FLIGHT_PARTS).await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %self.key,
                "Object write failed"
            );
            StorageError::from(e)
        })?;
        writer.write(chunk);
        self.bytes_written += chunk.len() as u64;

        Ok(chunk.len())
    }

    async fn close(&mut self) -> StorageResult<()> {
        let writer = self.take_writer()?;

        writer.finish().await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %self.key,
                size_bytes = self.bytes_written,
                duration_ms = self.started.elapsed().as_secs_f64() * 1000.0,
                "Object commit failed"
            );
            StorageError::from(e)
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %self.key,
            size_bytes = self.bytes_written,
            duration_ms = self.started.elapsed().as_secs_f64() * 1000.0,
            "Object committed"
        );

        Ok(())
    }

    async fn abort(&mut self) -> StorageResult<()> {
        let writer = self.take_writer()?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %self.key,
            size_bytes = self.bytes_written,
            "Aborting object write"
        );

        writer.abort().await.map_err(StorageError::from)
    }
}

impl Drop for ObjectWriteStream {
    fn drop(&mut self) {
        let Some(writer) = self.writer.take() else {
            return;
        };

        tracing::warn!(
            bucket = %self.bucket,
            key = %self.key,
            "Write stream dropped while opened, aborting upload"
        );

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let key = std::mem::take(&mut self.key);
            handle.spawn(async move {
                if let Err(e) = writer.abort().await {
                    tracing::warn!(error = %e, key = %key, "Background abort failed");
                }
            });
        }
    }
}
