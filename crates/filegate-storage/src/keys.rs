//! Shared key generation for storage backends.
//!
//! Key format: `{uuid_v7}-{original_file_name}`. The file name is kept as the
//! client sent it, except that the path delimiter `/` and ASCII control
//! characters are percent-encoded when the key is generated. The resulting key
//! is stored verbatim, so the name listed in the bucket is the key a client
//! passes back to `GET /files/{key}`.

use crate::traits::{StorageError, StorageResult};
use filegate_core::constants::OBJECT_KEY_SEPARATOR;
use object_store::path::{Path, DELIMITER};
use uuid::Uuid;

/// Generate a unique object key for the given client file name.
pub fn generate_object_key(desired_name: &str) -> String {
    format!(
        "{}{}{}",
        Uuid::now_v7(),
        OBJECT_KEY_SEPARATOR,
        escape_file_name(desired_name)
    )
}

fn escape_file_name(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if c == '/' || c.is_ascii_control() {
            escaped.push_str(&format!("%{:02X}", c as u32));
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Map an object key onto a single-segment store path, unchanged.
///
/// Keys that cannot name a flat object (empty, containing `/`, control
/// characters, `.` or `..`) are rejected with [`StorageError::InvalidKey`].
pub fn object_path(object_key: &str) -> StorageResult<Path> {
    if object_key.is_empty() || object_key.contains(DELIMITER) {
        return Err(StorageError::InvalidKey(object_key.to_string()));
    }
    Path::parse(object_key).map_err(|_| StorageError::InvalidKey(object_key.to_string()))
}
