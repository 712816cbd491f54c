//! Shared constants.

use std::time::Duration;

/// Size of the buffer the upload extractor reads into.
pub const UPLOAD_CHUNK_SIZE: usize = 4096;

/// Default validity window of a signed download URL.
pub const DEFAULT_SIGNED_URL_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default time in-flight requests get to finish after a shutdown signal.
pub const DEFAULT_SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(1);

/// Form field carrying the file for `POST /files`.
pub const FILE_FIELD_NAME: &str = "file";

/// Form field carrying the file for `POST /videos`.
pub const VIDEO_FIELD_NAME: &str = "video";

/// Separator between the generated id and the client file name in object keys.
pub const OBJECT_KEY_SEPARATOR: char = '-';
