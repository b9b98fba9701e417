//! Application state shared by all handlers.

use drivesync_core::{Config, TokenProvider};
use drivesync_storage::AssetStore;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub token_provider: Arc<dyn TokenProvider>,
    pub asset_store: Arc<dyn AssetStore>,
    /// Directory served under `/media`, `None` to serve nothing
    pub media_root: Option<PathBuf>,
}

impl AppState {
    pub fn new(
        config: Config,
        token_provider: Arc<dyn TokenProvider>,
        asset_store: Arc<dyn AssetStore>,
    ) -> Self {
        Self {
            config,
            token_provider,
            asset_store,
            media_root: None,
        }
    }

    pub fn with_media_root(mut self, media_root: impl Into<PathBuf>) -> Self {
        self.media_root = Some(media_root.into());
        self
    }
}
