//! Filegate Storage Library
//!
//! This crate is the blob store gateway: it bridges a local chunk producer to a
//! remote, append-only object write stream and issues signed, time-limited
//! download URLs. Every backend is an `object_store` client behind
//! [`ObjectStoreGateway`].
//!
//! # Object key format
//!
//! Keys are `{uuid_v7}-{original_file_name}`. The UUIDv7 prefix is time-ordered
//! and unique per call, so concurrent uploads of the same file name never
//! collide and keys sort by upload time. The key is always a single flat
//! object name; see the `keys` module.

pub mod factory;
mod gcs;
pub mod gateway;
pub mod keys;
mod local;
mod s3;
pub mod signer;
pub mod traits;
pub mod write_stream;

// Re-export commonly used types
pub use factory::create_blob_store;
pub use filegate_core::StorageBackend;
pub use gateway::{ObjectStoreGateway, UrlSigning};
pub use signer::HmacUrlSigner;
pub use traits::{BlobStore, ByteStream, StorageError, StorageResult, WriteStream, WriteStreamState};
pub use write_stream::ObjectWriteStream;
