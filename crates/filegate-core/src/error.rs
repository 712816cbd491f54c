//! Error types module
//!
//! All failures that reach the HTTP boundary are unified under [`AppError`].
//! Each variant self-describes how it is presented through [`ErrorMetadata`];
//! the HTTP layer decides between that typed status and a flat 500 based on
//! [`ErrorStatusMode`](crate::ErrorStatusMode).

use crate::config::ErrorStatusMode;
use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like client input problems
    Debug,
    /// Warning level - for limits being hit
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return when typed statuses are enabled
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("No file attached to the request: {0}")]
    NoFileAttached(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unable to read file: {0}")]
    ReadFailed(String),

    #[error("Upload failed: {message}")]
    UploadFailed {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Request timed out after {0} seconds")]
    RequestTimeout(u64),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::MalformedRequest(_) => (400, "MALFORMED_REQUEST", LogLevel::Debug),
        AppError::NoFileAttached(_) => (400, "NO_FILE_ATTACHED", LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", LogLevel::Warn),
        AppError::ReadFailed(_) => (400, "READ_FAILED", LogLevel::Warn),
        AppError::UploadFailed { .. } => (502, "UPLOAD_FAILED", LogLevel::Error),
        AppError::Storage(_) => (502, "STORAGE_ERROR", LogLevel::Error),
        AppError::RequestTimeout(_) => (504, "REQUEST_TIMEOUT", LogLevel::Warn),
        AppError::Forbidden(_) => (403, "FORBIDDEN", LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", LogLevel::Debug),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for logging
    pub fn error_type(&self) -> &str {
        match self {
            AppError::MalformedRequest(_) => "MalformedRequest",
            AppError::NoFileAttached(_) => "NoFileAttached",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::ReadFailed(_) => "ReadFailed",
            AppError::UploadFailed { .. } => "UploadFailed",
            AppError::Storage(_) => "Storage",
            AppError::RequestTimeout(_) => "RequestTimeout",
            AppError::Forbidden(_) => "Forbidden",
            AppError::NotFound(_) => "NotFound",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Status code to answer with under the given mapping mode.
    ///
    /// `Flat` answers 500 for everything; `Typed` uses [`ErrorMetadata::http_status_code`].
    pub fn status_code(&self, mode: ErrorStatusMode) -> u16 {
        match mode {
            ErrorStatusMode::Flat => 500,
            ErrorStatusMode::Typed => self.http_status_code(),
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}
