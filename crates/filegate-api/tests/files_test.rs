//! Upload and download-URL integration tests.
//!
//! Run with: `cargo test -p filegate-api --test files_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use helpers::storage::RecordingBlobStore;
use helpers::{setup_recording_app, setup_recording_app_with};
use serde_json::Value;
use std::time::Duration;

fn text_file(field: &str, name: &str, content: &'static [u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        field,
        Part::bytes(content).file_name(name).mime_type("text/plain"),
    )
}

#[tokio::test]
async fn test_upload_small_file_is_forwarded_in_one_chunk() {
    let app = setup_recording_app(&[]);

    let response = app
        .server
        .post("/files")
        .multipart(text_file("file", "example.txt", b"Hello, world!"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert!(response.text().is_empty());

    let recording = app.store.recording();
    assert_eq!(recording.opened.len(), 1);
    assert!(recording.opened[0].ends_with("-example.txt"));
    assert_eq!(recording.writes, vec![b"Hello, world!".to_vec()]);
    assert_eq!(recording.closed, 1);
    assert_eq!(recording.aborted, 0);
    assert_eq!(recording.dropped_open, 0);
}

#[tokio::test]
async fn test_upload_video_uses_video_field() {
    let app = setup_recording_app(&[]);

    let response = app
        .server
        .post("/videos")
        .multipart(text_file("video", "clip.mp4", b"not really a video"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(app.store.recording().closed, 1);
}

#[tokio::test]
async fn test_large_upload_is_chunked_in_order() {
    let app = setup_recording_app(&[]);
    let data: Vec<u8> = (0..20_000u32).map(|i| (i % 253) as u8).collect();

    let form = MultipartForm::new()
        .add_text("description", "ignored")
        .add_part("file", Part::bytes(data.clone()).file_name("big.bin"));
    let response = app.server.post("/files").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let recording = app.store.recording();
    assert!(recording.writes[..recording.writes.len() - 1]
        .iter()
        .all(|chunk| chunk.len() == 4096));
    assert_eq!(recording.writes.concat(), data);
    assert_eq!(recording.closed, 1);
}

#[tokio::test]
async fn test_upload_over_limit_aborts_stream() {
    let app = setup_recording_app(&[("MAX_UPLOAD_SIZE_BYTES", "10")]);

    let response = app
        .server
        .post("/files")
        .multipart(text_file("file", "example.txt", b"Hello, world!"))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("maximum upload size of 10 bytes"));

    let recording = app.store.recording();
    assert!(recording.writes.is_empty());
    assert_eq!(recording.aborted, 1);
    assert_eq!(recording.closed, 0);
}

#[tokio::test]
async fn test_upload_over_limit_with_typed_statuses() {
    let app = setup_recording_app(&[
        ("MAX_UPLOAD_SIZE_BYTES", "10"),
        ("ERROR_STATUS_MODE", "typed"),
    ]);

    let response = app
        .server
        .post("/files")
        .multipart(text_file("file", "example.txt", b"Hello, world!"))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_upload_at_limit_succeeds() {
    let app = setup_recording_app(&[("MAX_UPLOAD_SIZE_BYTES", "13")]);

    let response = app
        .server
        .post("/files")
        .multipart(text_file("file", "example.txt", b"Hello, world!"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_missing_field_makes_no_remote_calls() {
    let app = setup_recording_app(&[]);

    let response = app
        .server
        .post("/files")
        .multipart(text_file("video", "clip.mp4", b"wrong field"))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("No file attached"));
    assert!(app.store.recording().opened.is_empty());
}

#[tokio::test]
async fn test_missing_field_with_typed_statuses() {
    let app = setup_recording_app(&[("ERROR_STATUS_MODE", "typed")]);

    let response = app
        .server
        .post("/videos")
        .multipart(text_file("file", "a.txt", b"wrong field"))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_multipart_body_is_rejected() {
    let app = setup_recording_app(&[("ERROR_STATUS_MODE", "typed")]);

    let response = app
        .server
        .post("/files")
        .content_type("application/json")
        .text("{}")
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(app.store.recording().opened.is_empty());
}

#[tokio::test]
async fn test_remote_write_failure_aborts_stream() {
    let app = setup_recording_app_with(
        &[("ERROR_STATUS_MODE", "typed")],
        RecordingBlobStore::failing_writes(),
    );

    let response = app
        .server
        .post("/files")
        .multipart(text_file("file", "example.txt", b"Hello, world!"))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("quota exceeded"));

    let recording = app.store.recording();
    assert_eq!(recording.aborted, 1);
    assert_eq!(recording.closed, 0);
}

#[tokio::test]
async fn test_timed_out_upload_renders_flat_error_and_drops_stream() {
    let app = setup_recording_app_with(
        &[("REQUEST_TIMEOUT_SECS", "1")],
        RecordingBlobStore::slow_writes(Duration::from_secs(5)),
    );

    let response = app
        .server
        .post("/files")
        .multipart(text_file("file", "example.txt", b"Hello, world!"))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["message"], "Request timed out after 1 seconds");
    assert!(!response.header("x-request-id").is_empty());

    let recording = app.store.recording();
    assert_eq!(recording.opened.len(), 1);
    assert_eq!(recording.dropped_open, 1);
    assert_eq!(recording.closed, 0);
    assert!(recording.writes.is_empty());
}

#[tokio::test]
async fn test_timed_out_upload_with_typed_statuses() {
    let app = setup_recording_app_with(
        &[("REQUEST_TIMEOUT_SECS", "1"), ("ERROR_STATUS_MODE", "typed")],
        RecordingBlobStore::slow_writes(Duration::from_secs(5)),
    );

    let response = app
        .server
        .post("/videos")
        .multipart(text_file("video", "clip.mp4", b"frames"))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::GATEWAY_TIMEOUT);
    let body: Value = response.json();
    assert_eq!(body["message"], "Request timed out after 1 seconds");
    assert_eq!(app.store.recording().dropped_open, 1);
}

#[tokio::test]
async fn test_slow_upload_completes_without_configured_timeout() {
    let app = setup_recording_app_with(
        &[],
        RecordingBlobStore::slow_writes(Duration::from_millis(1200)),
    );

    let response = app
        .server
        .post("/files")
        .multipart(text_file("file", "slow.txt", b"eventually"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let recording = app.store.recording();
    assert_eq!(recording.closed, 1);
    assert_eq!(recording.dropped_open, 0);
}

#[tokio::test]
async fn test_forwarding_disabled_discards_bytes() {
    let app = setup_recording_app(&[("UPLOAD_FORWARDING_ENABLED", "false")]);

    let response = app
        .server
        .post("/files")
        .multipart(text_file("file", "example.txt", b"Hello, world!"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert!(app.store.recording().opened.is_empty());
}

#[tokio::test]
async fn test_forwarding_disabled_still_enforces_limit() {
    let app = setup_recording_app(&[
        ("UPLOAD_FORWARDING_ENABLED", "false"),
        ("MAX_UPLOAD_SIZE_BYTES", "4"),
    ]);

    let response = app
        .server
        .post("/files")
        .multipart(text_file("file", "example.txt", b"Hello, world!"))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_get_url_for_unknown_key() {
    let app = setup_recording_app(&[]);

    let response = app.server.get("/files/unknown-key").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("https://storage.test/recording/unknown-key"));
    assert!(url.ends_with("expires_in=86400"));
    assert_eq!(app.store.recording().signed, vec!["unknown-key".to_string()]);
}

#[tokio::test]
async fn test_get_video_url_uses_configured_ttl() {
    let app = setup_recording_app(&[("SIGNED_URL_TTL_SECS", "60")]);

    let response = app.server.get("/videos/0190-clip.mp4").await;

    let body: Value = response.json();
    assert!(body["url"].as_str().unwrap().ends_with("expires_in=60"));
}

#[tokio::test]
async fn test_health_and_request_id() {
    let app = setup_recording_app(&[]);

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "alive");
    assert!(!response.header("x-request-id").is_empty());

    let response = app
        .server
        .get("/health")
        .add_header("X-Request-ID", "req-42")
        .await;
    assert_eq!(response.header("x-request-id"), "req-42");
}

#[tokio::test]
async fn test_error_responses_carry_request_id() {
    let app = setup_recording_app(&[]);

    let response = app
        .server
        .post("/files")
        .multipart(text_file("other", "a.txt", b"x"))
        .expect_failure()
        .await;

    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_recording_app(&[]);

    let response = app.server.get("/api/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let spec: Value = response.json();
    assert!(spec["paths"]["/files"].is_object());
    assert!(spec["paths"]["/videos/{file_name}"].is_object());
}

#[tokio::test]
async fn test_signed_route_absent_without_local_signing() {
    let app = setup_recording_app(&[]);

    let response = app
        .server
        .get("/signed/some-key")
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
