#![allow(dead_code)]

//! Test helpers: build AppState and router for integration tests.
//!
//! Every app gets its own temp directories and an in-memory token store, so tests run in
//! parallel without sharing state.

pub mod stores;

use axum_test::TestServer;
use drivesync_api::setup::routes;
use drivesync_api::AppState;
use drivesync_core::{Config, LogFormat, ServiceConfig, TokenProvider};
use drivesync_storage::{AssetStore, InMemoryTokenStore, LocalAssetStore};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_TOKEN: &str = "abc123abc123abc123abc123abc123abc123abc1";
pub const TOKEN_HEADER: &str = "X-Drive-Sync-Token";
pub const UPLOAD_PATH: &str = "/drive-sync/v1/upload";
pub const BASE_URL: &str = "http://localhost:4000/media";

/// Test application: server plus the directories and stores behind it.
pub struct TestApp {
    pub server: TestServer,
    pub tokens: Arc<InMemoryTokenStore>,
    pub temp_dir: TempDir,
    pub _store_dir: TempDir,
}

impl TestApp {
    /// Number of files left in the upload temp directory.
    pub fn temp_entries(&self) -> usize {
        std::fs::read_dir(self.temp_dir.path()).unwrap().count()
    }
}

pub fn test_config(temp_dir: &Path, store_dir: &Path) -> Config {
    Config::new(ServiceConfig {
        server_port: 0,
        environment: "test".to_string(),
        sync_token_file: store_dir.join("sync_token"),
        upload_temp_dir: temp_dir.to_path_buf(),
        asset_storage_path: store_dir.to_path_buf(),
        asset_base_url: BASE_URL.to_string(),
        max_upload_size_bytes: 1024 * 1024,
        allowed_mime_types: vec!["image/*".to_string(), "application/pdf".to_string()],
        serve_media: true,
        request_timeout_secs: 30,
        log_format: LogFormat::Compact,
    })
}

/// App backed by a real `LocalAssetStore`; also returns the store for inspection.
pub async fn setup_test_app() -> (TestApp, Arc<LocalAssetStore>) {
    let temp_dir = TempDir::new().unwrap();
    let store_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path(), store_dir.path());

    let store = Arc::new(
        LocalAssetStore::new(
            config.asset_storage_path().clone(),
            config.asset_base_url().to_string(),
            config.max_upload_size_bytes() as u64,
            config.allowed_mime_types().to_vec(),
        )
        .await
        .expect("Failed to create asset store"),
    );
    let media_root = store.media_path().to_path_buf();

    let app = build(config, temp_dir, store_dir, store.clone(), Some(media_root.as_path()));
    (app, store)
}

/// App backed by an arbitrary asset store, with media serving off.
pub fn setup_with_store(store: Arc<dyn AssetStore>) -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let store_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path(), store_dir.path());
    build(config, temp_dir, store_dir, store, None)
}

fn build(
    config: Config,
    temp_dir: TempDir,
    store_dir: TempDir,
    store: Arc<dyn AssetStore>,
    media_root: Option<&Path>,
) -> TestApp {
    let tokens = Arc::new(InMemoryTokenStore::with_token(TEST_TOKEN));
    let provider: Arc<dyn TokenProvider> = tokens.clone();

    let mut state = AppState::new(config.clone(), provider, store);
    if let Some(root) = media_root {
        state = state.with_media_root(root);
    }

    let app = routes::setup_routes(&config, Arc::new(state));
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        tokens,
        temp_dir,
        _store_dir: store_dir,
    }
}
