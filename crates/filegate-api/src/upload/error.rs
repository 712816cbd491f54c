use crate::upload::consumer::BoxError;
use filegate_core::AppError;
use thiserror::Error;

/// Failures of the upload extractor and its chunk loop.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid multipart request: {0}")]
    MalformedRequest(String),

    #[error("no file attached to the request under field '{0}'")]
    NoFileAttached(String),

    #[error("maximum upload size of {max_size} bytes has been exceeded")]
    MaxSizeExceeded { max_size: u64 },

    #[error("unable to read file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("an error occurred while processing a chunk: {0}")]
    CallbackFailed(#[source] BoxError),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::MalformedRequest(msg) => AppError::MalformedRequest(msg),
            UploadError::NoFileAttached(field) => {
                AppError::NoFileAttached(format!("expected form field '{}'", field))
            }
            err @ UploadError::MaxSizeExceeded { .. } => AppError::PayloadTooLarge(err.to_string()),
            UploadError::ReadFailed(e) => AppError::ReadFailed(e.to_string()),
            UploadError::CallbackFailed(source) => AppError::UploadFailed {
                message: source.to_string(),
                source,
            },
        }
    }
}
