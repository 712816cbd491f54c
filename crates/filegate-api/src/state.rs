//! Application state shared by all handlers.

use filegate_core::Config;
use filegate_storage::{BlobStore, HmacUrlSigner};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Gateway bound to the configured bucket.
    pub store: Arc<dyn BlobStore>,
    /// Present when download URLs are HMAC-signed and served by this process.
    pub url_signer: Option<Arc<HmacUrlSigner>>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn BlobStore>,
        url_signer: Option<Arc<HmacUrlSigner>>,
    ) -> Self {
        Self {
            config,
            store,
            url_signer,
        }
    }
}
