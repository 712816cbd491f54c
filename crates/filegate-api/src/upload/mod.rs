//! Streaming multipart upload pipeline.
//!
//! [`FileUpload`] locates the file part of a multipart request and reads it in
//! fixed-size chunks; a [`ChunkConsumer`] receives each chunk in order.
//! [`forward_upload`] ties both to a blob store write stream and guarantees the
//! stream is closed or aborted exactly once.

pub mod consumer;
pub mod error;
pub mod extractor;
pub mod forward;

pub use consumer::{BoxError, ChunkConsumer, DiscardConsumer, StreamForwarder};
pub use error::UploadError;
pub use extractor::{FieldReader, FileUpload};
pub use forward::{forward_upload, ForwardedUpload};
