//! Configuration validation
//!
//! Checks that go beyond parsing and need the filesystem or the environment.

use anyhow::Result;
use drivesync_core::Config;

/// Validate configuration at startup, failing fast on anything that would break uploads.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.sync_token_file().is_dir() {
        return Err(anyhow::anyhow!(
            "SYNC_TOKEN_FILE points at a directory: {}",
            config.sync_token_file().display()
        ));
    }

    let temp_dir = config.upload_temp_dir();
    if temp_dir.exists() && !temp_dir.is_dir() {
        return Err(anyhow::anyhow!(
            "UPLOAD_TEMP_DIR is not a directory: {}",
            temp_dir.display()
        ));
    }

    let storage_path = config.asset_storage_path();
    if storage_path.exists() && !storage_path.is_dir() {
        return Err(anyhow::anyhow!(
            "ASSET_STORAGE_PATH is not a directory: {}",
            storage_path.display()
        ));
    }

    if config.is_production() && config.asset_base_url().starts_with("http://") {
        tracing::warn!(
            base_url = %config.asset_base_url(),
            "ASSET_BASE_URL is not HTTPS in production"
        );
    }

    if !config.serve_media() {
        tracing::info!("SERVE_MEDIA disabled; asset URLs must be served by another host");
    }

    Ok(())
}
