//! Blob store abstraction traits
//!
//! This module defines the [`BlobStore`] gateway trait and the [`WriteStream`]
//! handle it hands out for a single object under construction.

use crate::StorageBackend;
use filegate_core::AppError;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failure reported by the remote store (auth, quota, network), unmodified.
    #[error(transparent)]
    Backend(#[from] object_store::Error),

    #[error("Write stream for {0} is already closed")]
    StreamClosed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid object key: {0:?}")]
    InvalidKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Signed URL expired for {0}")]
    Expired(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(key),
            StorageError::InvalidKey(_) => AppError::MalformedRequest(err.to_string()),
            StorageError::InvalidSignature(_) | StorageError::Expired(_) => {
                AppError::Forbidden(err.to_string())
            }
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Stream of object bytes returned by [`BlobStore::download_stream`].
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Lifecycle of a [`WriteStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStreamState {
    /// Accepting writes.
    Opened,
    /// Committed or aborted. Terminal.
    Closed,
}

/// An open, append-only handle to a remote object under construction.
///
/// The caller owns the obligation to end the stream exactly once, with either
/// [`close`](WriteStream::close) (commit) or [`abort`](WriteStream::abort)
/// (discard). Both move the stream to [`WriteStreamState::Closed`]; any later
/// `write`, `close` or `abort` fails with [`StorageError::StreamClosed`].
#[async_trait]
pub trait WriteStream: Send {
    /// Object key this stream writes to.
    fn key(&self) -> &str;

    fn state(&self) -> WriteStreamState;

    /// Append a chunk and return the number of bytes accepted.
    ///
    /// Waits for upload capacity before buffering, so a slow remote store
    /// slows the producer instead of growing memory.
    async fn write(&mut self, chunk: &[u8]) -> StorageResult<usize>;

    /// Commit the object remotely.
    async fn close(&mut self) -> StorageResult<()>;

    /// Discard the object without committing anything.
    async fn abort(&mut self) -> StorageResult<()>;
}

/// Blob store gateway trait
///
/// One gateway is bound to one bucket. Implementations must be cheap to share
/// across concurrent requests.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Bucket every key of this gateway lives in.
    fn bucket(&self) -> &str;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;

    /// Open a write stream for a new object.
    ///
    /// The object key is derived from `desired_name` by prefixing a fresh,
    /// sortable unique id, so two calls never address the same object.
    async fn open_write_stream(&self, desired_name: &str) -> StorageResult<Box<dyn WriteStream>>;

    /// Generate a GET-only signed URL valid for `expires_in`.
    ///
    /// Existence of the object is not checked; a URL for a missing key only
    /// fails when fetched.
    async fn signed_url(&self, object_key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Download an object as a stream of chunks.
    async fn download_stream(&self, object_key: &str) -> StorageResult<ByteStream>;
}
