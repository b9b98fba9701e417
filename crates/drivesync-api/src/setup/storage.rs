//! Token store, temp directory and asset store setup

use anyhow::{Context, Result};
use drivesync_core::{ensure_sync_token, Config, TokenProvider};
use drivesync_storage::{create_asset_store, create_token_store, AssetStore};
use std::path::PathBuf;
use std::sync::Arc;

pub struct StorageSetup {
    pub token_provider: Arc<dyn TokenProvider>,
    pub asset_store: Arc<dyn AssetStore>,
    /// Directory holding stored media, the target of `ASSET_BASE_URL`
    pub media_root: PathBuf,
}

/// Prepare persistent state: make sure a sync token exists, the temp directory is there
/// and the asset store is open.
pub async fn setup_storage(config: &Config) -> Result<StorageSetup> {
    let token_provider = create_token_store(config);
    let created = ensure_sync_token(token_provider.as_ref())
        .await
        .with_context(|| {
            format!(
                "Failed to initialize sync token at {}",
                config.sync_token_file().display()
            )
        })?;
    if created {
        tracing::info!(
            path = %config.sync_token_file().display(),
            "New sync token written; read it with `drivesync token show`"
        );
    }

    tokio::fs::create_dir_all(config.upload_temp_dir())
        .await
        .with_context(|| {
            format!(
                "Failed to create upload temp directory {}",
                config.upload_temp_dir().display()
            )
        })?;

    let store = create_asset_store(config)
        .await
        .context("Failed to initialize asset store")?;
    let media_root = store.media_path().to_path_buf();

    Ok(StorageSetup {
        token_provider,
        asset_store: store,
        media_root,
    })
}
