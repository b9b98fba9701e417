//! Asset store doubles.

use async_trait::async_trait;
use drivesync_core::models::{AssetId, AssetMetadata};
use drivesync_storage::{AssetStore, AssetStoreError, AssetStoreResult};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Accepts everything without touching the file and counts calls.
#[derive(Default)]
pub struct RecordingStore {
    pub registered: AtomicUsize,
    pub url_lookups: AtomicUsize,
    /// Resolve no URL for registered assets
    pub without_urls: bool,
}

impl RecordingStore {
    pub fn calls(&self) -> usize {
        self.registered.load(Ordering::SeqCst) + self.url_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetStore for RecordingStore {
    async fn register_asset(
        &self,
        _temp_path: &Path,
        _file_name: &str,
        _mime_type: &str,
        _metadata: &AssetMetadata,
    ) -> AssetStoreResult<AssetId> {
        self.registered.fetch_add(1, Ordering::SeqCst);
        Ok(AssetId::new())
    }

    async fn public_url(&self, asset_id: &AssetId) -> AssetStoreResult<Option<String>> {
        self.url_lookups.fetch_add(1, Ordering::SeqCst);
        if self.without_urls {
            return Ok(None);
        }
        Ok(Some(format!("http://assets.test/{}", asset_id)))
    }

    async fn health_check(&self) -> AssetStoreResult<()> {
        Ok(())
    }
}

/// Rejects every registration with a fixed status, code and message.
pub struct RejectingStore {
    pub status: Option<u16>,
    pub code: &'static str,
    pub message: &'static str,
}

#[async_trait]
impl AssetStore for RejectingStore {
    async fn register_asset(
        &self,
        temp_path: &Path,
        _file_name: &str,
        _mime_type: &str,
        _metadata: &AssetMetadata,
    ) -> AssetStoreResult<AssetId> {
        assert!(temp_path.exists(), "temp file must exist during registration");
        Err(AssetStoreError::Rejected {
            status: self.status,
            code: self.code.to_string(),
            message: self.message.to_string(),
        })
    }

    async fn public_url(&self, _asset_id: &AssetId) -> AssetStoreResult<Option<String>> {
        Ok(None)
    }

    async fn health_check(&self) -> AssetStoreResult<()> {
        Err(AssetStoreError::ConfigError("store offline".to_string()))
    }
}
