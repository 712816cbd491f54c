//! Filegate Core Library
//!
//! This crate provides configuration, the error taxonomy and shared constants
//! used by the storage gateway and the HTTP API.

pub mod config;
pub mod constants;
pub mod error;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ErrorStatusMode, LogFormat, ServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
