use crate::{AssetStoreResult, FileTokenStore, LocalAssetStore};
use drivesync_core::{Config, TokenProvider};
use std::sync::Arc;

/// Build the local asset store described by the configuration.
pub async fn create_asset_store(config: &Config) -> AssetStoreResult<Arc<LocalAssetStore>> {
    let store = LocalAssetStore::new(
        config.asset_storage_path().clone(),
        config.asset_base_url().to_string(),
        config.max_upload_size_bytes() as u64,
        config.allowed_mime_types().to_vec(),
    )
    .await?;

    tracing::info!(
        path = %store.media_path().display(),
        base_url = %config.asset_base_url(),
        "Local asset store ready"
    );

    Ok(Arc::new(store))
}

/// Token store backed by the configured token file.
pub fn create_token_store(config: &Config) -> Arc<dyn TokenProvider> {
    Arc::new(FileTokenStore::new(config.sync_token_file().clone()))
}

