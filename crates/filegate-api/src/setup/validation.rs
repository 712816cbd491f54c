//! Configuration validation
//!
//! Validates configuration at startup to catch misconfigurations early.

use anyhow::Result;
use filegate_core::Config;

/// Fail fast on inconsistent settings, warn on risky ones.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.max_upload_size_bytes().is_none() {
        tracing::warn!("MAX_UPLOAD_SIZE_BYTES not set - uploads are unlimited");
    }

    if !config.upload_forwarding_enabled() {
        tracing::warn!("UPLOAD_FORWARDING_ENABLED=false - uploads are read and discarded");
    }

    if config.request_timeout().is_none() {
        tracing::warn!("REQUEST_TIMEOUT_SECS=0 - requests never time out");
    }

    Ok(())
}
