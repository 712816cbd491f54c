//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p filegate-api`.

pub mod storage;

use axum_test::TestServer;
use filegate_api::setup::routes;
use filegate_api::state::AppState;
use filegate_core::{Config, ServiceConfig};
use filegate_storage::{BlobStore, HmacUrlSigner, ObjectStoreGateway};
use std::collections::HashMap;
use std::sync::Arc;

pub const TEST_PUBLIC_BASE_URL: &str = "http://files.test";
pub const TEST_SIGNING_SECRET: &str = "integration-test-secret";

/// Build a config from explicit variables only; the process environment is ignored.
pub fn test_config(pairs: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("STORAGE_BACKEND".to_string(), "memory".to_string()),
        ("PUBLIC_BASE_URL".to_string(), TEST_PUBLIC_BASE_URL.to_string()),
        ("URL_SIGNING_SECRET".to_string(), TEST_SIGNING_SECRET.to_string()),
    ]);
    for (k, v) in pairs {
        vars.insert(k.to_string(), v.to_string());
    }
    let service = ServiceConfig::from_vars(|k| vars.get(k).cloned()).expect("valid test config");
    Config(Box::new(service))
}

fn server(config: Config, store: Arc<dyn BlobStore>, signer: Option<Arc<HmacUrlSigner>>) -> TestServer {
    let state = Arc::new(AppState::new(config.clone(), store, signer));
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    TestServer::new(app.into_make_service()).expect("Failed to create test server")
}

/// Test application backed by the recording gateway.
pub struct RecordingApp {
    pub server: TestServer,
    pub store: Arc<storage::RecordingBlobStore>,
}

pub fn setup_recording_app(pairs: &[(&str, &str)]) -> RecordingApp {
    setup_recording_app_with(pairs, storage::RecordingBlobStore::new())
}

pub fn setup_recording_app_with(
    pairs: &[(&str, &str)],
    store: storage::RecordingBlobStore,
) -> RecordingApp {
    let store = Arc::new(store);
    let server = server(test_config(pairs), store.clone(), None);
    RecordingApp { server, store }
}

/// Test application backed by the in-memory `object_store` gateway.
pub struct MemoryApp {
    pub server: TestServer,
    pub gateway: ObjectStoreGateway,
}

pub async fn setup_memory_app(pairs: &[(&str, &str)]) -> MemoryApp {
    let config = test_config(pairs);
    let gateway = filegate_storage::create_blob_store(&config)
        .await
        .expect("memory gateway");
    let signer = gateway.hmac_signer();
    let server = server(config, Arc::new(gateway.clone()), signer);
    MemoryApp { server, gateway }
}

/// Split a signed URL into its path and `(expires, signature)` query values.
pub fn split_signed_url(url: &str) -> (String, String, String) {
    let rest = url
        .strip_prefix(TEST_PUBLIC_BASE_URL)
        .expect("URL uses the public base URL");
    let (path, query) = rest.split_once('?').expect("URL has a query");
    let mut expires = String::new();
    let mut signature = String::new();
    for pair in query.split('&') {
        match pair.split_once('=') {
            Some(("expires", v)) => expires = v.to_string(),
            Some(("signature", v)) => signature = v.to_string(),
            _ => {}
        }
    }
    (path.to_string(), expires, signature)
}
