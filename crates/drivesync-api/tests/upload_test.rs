mod helpers;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use drivesync_core::TokenProvider;
use helpers::stores::{RecordingStore, RejectingStore};
use helpers::{setup_test_app, setup_with_store, BASE_URL, TEST_TOKEN, TOKEN_HEADER, UPLOAD_PATH};
use serde_json::{json, Value};
use std::sync::Arc;

fn upload_body(file_name: &str, mime_type: &str, bytes: &[u8], category: &str) -> Value {
    json!({
        "fileName": file_name,
        "mimeType": mime_type,
        "fileData": STANDARD.encode(bytes),
        "category": category,
    })
}

#[tokio::test]
async fn test_missing_token_is_rejected_before_anything_happens() {
    let store = Arc::new(RecordingStore::default());
    let app = setup_with_store(store.clone());

    let response = app
        .server
        .post(UPLOAD_PATH)
        .json(&upload_body("photo.png", "image/png", b"PNGDATA", ""))
        .await;

    assert_eq!(response.status_code(), 401);
    let data: Value = response.json();
    assert_eq!(data["code"], "invalid-token");
    assert_eq!(data["message"], "Invalid or missing sync token.");
    assert_eq!(store.calls(), 0);
    assert_eq!(app.temp_entries(), 0);
}

#[tokio::test]
async fn test_wrong_or_empty_token_is_rejected() {
    let store = Arc::new(RecordingStore::default());
    let app = setup_with_store(store.clone());

    for token in ["wrong-token", "", &TEST_TOKEN[..39]] {
        let response = app
            .server
            .post(UPLOAD_PATH)
            .add_header(TOKEN_HEADER, token)
            .json(&json!({ "dryRun": true }))
            .await;
        assert_eq!(response.status_code(), 401, "token {:?} accepted", token);
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_unauthenticated_garbage_body_is_still_401() {
    let app = setup_with_store(Arc::new(RecordingStore::default()));

    let response = app
        .server
        .post(UPLOAD_PATH)
        .text("{ this is not json")
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_regenerated_token_replaces_old_one() {
    let app = setup_with_store(Arc::new(RecordingStore::default()));
    app.tokens.set("fresh-token-value").await.unwrap();

    let old = app
        .server
        .post(UPLOAD_PATH)
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .json(&json!({ "dryRun": true }))
        .await;
    assert_eq!(old.status_code(), 401);

    let new = app
        .server
        .post(UPLOAD_PATH)
        .add_header(TOKEN_HEADER, "fresh-token-value")
        .json(&json!({ "dryRun": true }))
        .await;
    assert_eq!(new.status_code(), 202);
}

#[tokio::test]
async fn test_dry_run_is_acknowledged_without_side_effects() {
    let store = Arc::new(RecordingStore::default());
    let app = setup_with_store(store.clone());

    for body in [
        json!({ "dryRun": true }),
        json!({ "dryRun": true, "fileData": "not-base64!!" }),
        json!({ "dryRun": "true", "mimeType": "" }),
    ] {
        let response = app
            .server
            .post(UPLOAD_PATH)
            .add_header(TOKEN_HEADER, TEST_TOKEN)
            .json(&body)
            .await;

        assert_eq!(response.status_code(), 202);
        let data: Value = response.json();
        assert_eq!(data["message"], "Dry run acknowledged");
    }

    assert_eq!(store.calls(), 0);
    assert_eq!(app.temp_entries(), 0);
}

#[tokio::test]
async fn test_invalid_base64_is_rejected() {
    let store = Arc::new(RecordingStore::default());
    let app = setup_with_store(store.clone());

    let response = app
        .server
        .post(UPLOAD_PATH)
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .json(&json!({
            "fileName": "photo.png",
            "mimeType": "image/png",
            "fileData": "not-base64!!",
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let data: Value = response.json();
    assert_eq!(data["code"], "invalid-payload");
    assert_eq!(data["message"], "fileData must be valid base64.");
    assert_eq!(store.calls(), 0);
    assert_eq!(app.temp_entries(), 0);
}

#[tokio::test]
async fn test_missing_field_is_rejected() {
    let app = setup_with_store(Arc::new(RecordingStore::default()));

    let response = app
        .server
        .post(UPLOAD_PATH)
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .json(&json!({ "fileName": "photo.png", "mimeType": "image/png" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let data: Value = response.json();
    assert_eq!(data["code"], "missing-field");
    assert_eq!(data["message"], "Missing parameter: fileData");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = setup_with_store(Arc::new(RecordingStore::default()));

    let response = app
        .server
        .post(UPLOAD_PATH)
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .text("{ this is not json")
        .await;

    assert_eq!(response.status_code(), 400);
    let data: Value = response.json();
    assert_eq!(data["code"], "invalid-request");
}

#[tokio::test]
async fn test_photo_upload_scenario() {
    let (app, store) = setup_test_app().await;

    let response = app
        .server
        .post(UPLOAD_PATH)
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .json(&upload_body("photo.png", "image/png", b"PNGDATA", "events"))
        .await;

    assert_eq!(response.status_code(), 201);
    let data: Value = response.json();
    assert_eq!(data["category"], "events");

    let url = data["url"].as_str().expect("url should be present");
    assert!(url.starts_with(BASE_URL));
    assert!(url.ends_with("/photo.png"));

    let asset_id = data["attachment_id"].as_str().unwrap().parse().unwrap();
    assert_eq!(store.read(&asset_id).await.unwrap(), b"PNGDATA");
    assert_eq!(app.temp_entries(), 0);

    // The returned URL resolves against this server.
    let path = url.trim_start_matches("http://localhost:4000");
    let media = app.server.get(path).await;
    assert_eq!(media.status_code(), 200);
    assert_eq!(media.as_bytes().to_vec(), b"PNGDATA".to_vec());
}

#[tokio::test]
async fn test_round_trip_preserves_bytes() {
    let (app, store) = setup_test_app().await;
    let bytes: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 251) as u8).collect();

    let response = app
        .server
        .post(UPLOAD_PATH)
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .json(&upload_body("scan 01.pdf", "application/pdf", &bytes, ""))
        .await;

    assert_eq!(response.status_code(), 201);
    let data: Value = response.json();
    assert_eq!(data["category"], "");
    assert!(data["url"].as_str().unwrap().ends_with("/scan-01.pdf"));

    let asset_id = data["attachment_id"].as_str().unwrap().parse().unwrap();
    assert_eq!(store.read(&asset_id).await.unwrap(), bytes);
}

#[tokio::test]
async fn test_same_name_twice_gets_distinct_urls() {
    let (app, _store) = setup_test_app().await;

    let mut urls = Vec::new();
    for _ in 0..2 {
        let response = app
            .server
            .post(UPLOAD_PATH)
            .add_header(TOKEN_HEADER, TEST_TOKEN)
            .json(&upload_body("photo.png", "image/png", b"x", ""))
            .await;
        assert_eq!(response.status_code(), 201);
        let data: Value = response.json();
        urls.push(data["url"].as_str().unwrap().to_string());
    }

    assert_ne!(urls[0], urls[1]);
    assert!(urls[1].ends_with("/photo-1.png"));
}

#[tokio::test]
async fn test_unsupported_type_passes_store_error_through() {
    let (app, _store) = setup_test_app().await;

    let response = app
        .server
        .post(UPLOAD_PATH)
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .json(&upload_body("setup.exe", "application/x-msdownload", b"MZ", ""))
        .await;

    assert_eq!(response.status_code(), 415);
    let data: Value = response.json();
    assert_eq!(data["code"], "unsupported-file-type");
    assert_eq!(app.temp_entries(), 0);
}

#[tokio::test]
async fn test_empty_file_data_is_a_missing_field() {
    let (app, _store) = setup_test_app().await;

    let response = app
        .server
        .post(UPLOAD_PATH)
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .json(&json!({
            "fileName": "blank.png",
            "mimeType": "image/png",
            "fileData": "",
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let data: Value = response.json();
    assert_eq!(data["code"], "missing-field");
    assert_eq!(app.temp_entries(), 0);
}

#[tokio::test]
async fn test_registration_failure_cleans_up_and_passes_through() {
    let app = setup_with_store(Arc::new(RejectingStore {
        status: Some(507),
        code: "quota-exceeded",
        message: "Storage quota exceeded.",
    }));

    let response = app
        .server
        .post(UPLOAD_PATH)
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .json(&upload_body("photo.png", "image/png", b"PNGDATA", ""))
        .await;

    assert_eq!(response.status_code(), 507);
    let data: Value = response.json();
    assert_eq!(data["code"], "quota-exceeded");
    assert_eq!(data["message"], "Storage quota exceeded.");
    assert_eq!(app.temp_entries(), 0);
}

#[tokio::test]
async fn test_registration_failure_without_status_defaults_to_500() {
    let app = setup_with_store(Arc::new(RejectingStore {
        status: None,
        code: "",
        message: "Something broke downstream.",
    }));

    let response = app
        .server
        .post(UPLOAD_PATH)
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .json(&upload_body("photo.png", "image/png", b"PNGDATA", ""))
        .await;

    assert_eq!(response.status_code(), 500);
    let data: Value = response.json();
    assert_eq!(data["code"], "registration-failed");
    assert_eq!(app.temp_entries(), 0);
}

#[tokio::test]
async fn test_unresolvable_url_still_succeeds() {
    let store = Arc::new(RecordingStore {
        without_urls: true,
        ..Default::default()
    });
    let app = setup_with_store(store.clone());

    let response = app
        .server
        .post(UPLOAD_PATH)
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .json(&upload_body("photo.png", "image/png", b"PNGDATA", "events"))
        .await;

    assert_eq!(response.status_code(), 201);
    let data: Value = response.json();
    assert!(data["url"].is_null());
    assert_eq!(data["category"], "events");
    assert_eq!(store.registered.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_category_and_name_are_sanitized() {
    let (app, _store) = setup_test_app().await;

    let response = app
        .server
        .post(UPLOAD_PATH)
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .json(&upload_body(
            "../../etc/My Photo.png",
            "image/png",
            b"x",
            "<script>x</script>team\tevents",
        ))
        .await;

    assert_eq!(response.status_code(), 201);
    let data: Value = response.json();
    assert_eq!(data["category"], "xteam events");
    assert!(data["url"].as_str().unwrap().ends_with("/My-Photo.png"));
}

#[tokio::test]
async fn test_names_with_dot_runs_are_accepted() {
    let (app, store) = setup_test_app().await;

    let response = app
        .server
        .post(UPLOAD_PATH)
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .json(&upload_body("holiday..final.png", "image/png", b"PNGDATA", ""))
        .await;

    assert_eq!(response.status_code(), 201);
    let data: Value = response.json();
    assert!(data["url"].as_str().unwrap().ends_with("/holiday..final.png"));

    let asset_id = data["attachment_id"].as_str().unwrap().parse().unwrap();
    assert_eq!(store.read(&asset_id).await.unwrap(), b"PNGDATA");
}

#[tokio::test]
async fn test_long_non_ascii_name_is_stored_and_served() {
    let (app, store) = setup_test_app().await;
    let name = format!("{}.png", "ф".repeat(200));

    let mut urls = Vec::new();
    for _ in 0..2 {
        let response = app
            .server
            .post(UPLOAD_PATH)
            .add_header(TOKEN_HEADER, TEST_TOKEN)
            .json(&upload_body(&name, "image/png", b"PNGDATA", ""))
            .await;

        assert_eq!(response.status_code(), 201);
        let data: Value = response.json();
        let asset_id = data["attachment_id"].as_str().unwrap().parse().unwrap();
        assert_eq!(store.read(&asset_id).await.unwrap(), b"PNGDATA");
        urls.push(data["url"].as_str().unwrap().to_string());
    }

    assert!(urls.iter().all(|url| url.is_ascii()));
    assert!(urls[0].contains("%D1%84"));
    assert!(urls[1].ends_with("-1.png"));

    let path = urls[0].trim_start_matches("http://localhost:4000");
    let media = app.server.get(path).await;
    assert_eq!(media.status_code(), 200);
    assert_eq!(media.as_bytes().to_vec(), b"PNGDATA".to_vec());
}
