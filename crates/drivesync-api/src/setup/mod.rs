//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use drivesync_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    drivesync_infra::init_telemetry(
        config.log_format(),
        env!("CARGO_PKG_NAME"),
        config.environment(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let storage = storage::setup_storage(&config).await?;

    let mut state = AppState::new(config.clone(), storage.token_provider, storage.asset_store);
    if config.serve_media() {
        state = state.with_media_root(storage.media_root);
    }
    let state = Arc::new(state);

    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
