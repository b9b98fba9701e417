use crate::services::ingest::temp_file::TempFileHandle;
use crate::state::AppState;
use drivesync_core::models::{AssetMetadata, DecodedPayload, IngestedAsset};
use drivesync_core::AppError;
use drivesync_storage::AssetStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Stages decoded bytes in a temp file and sideloads them into the asset store.
pub struct IngestionPipeline {
    store: Arc<dyn AssetStore>,
    temp_dir: PathBuf,
}

impl IngestionPipeline {
    pub fn new(store: Arc<dyn AssetStore>, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            temp_dir: temp_dir.into(),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.asset_store.clone(), state.config.upload_temp_dir().clone())
    }

    /// Register `payload` as a new asset.
    ///
    /// The temp file is removed on every failure. On success it belongs to the store and
    /// is left alone. A URL that cannot be resolved does not fail the ingestion.
    #[tracing::instrument(
        skip(self, payload),
        fields(
            file_name = %payload.file_name,
            mime_type = %payload.mime_type,
            size_bytes = payload.bytes.len()
        )
    )]
    pub async fn ingest(&self, payload: DecodedPayload) -> Result<IngestedAsset, AppError> {
        let handle = TempFileHandle::allocate(&self.temp_dir, &payload.file_name)
            .map_err(AppError::TempAllocation)?;
        self.ingest_into(handle, payload).await
    }

    /// Write `payload` into an already allocated temp file and register it.
    async fn ingest_into(
        &self,
        handle: TempFileHandle,
        payload: DecodedPayload,
    ) -> Result<IngestedAsset, AppError> {
        if let Err(e) = handle.write_all(&payload.bytes).await {
            handle.discard();
            return Err(AppError::TempWrite(e));
        }

        let file_name = if payload.file_name.is_empty() {
            handle.file_name()
        } else {
            payload.file_name.clone()
        };
        let metadata = AssetMetadata {
            category: payload.category.clone(),
        };

        let asset_id = match self
            .store
            .register_asset(handle.path(), &file_name, &payload.mime_type, &metadata)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                handle.discard();
                return Err(e.into());
            }
        };
        handle.release();

        let public_url = match self.store.public_url(&asset_id).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(asset_id = %asset_id, error = %e, "Could not resolve asset URL");
                None
            }
        };

        tracing::info!(asset_id = %asset_id, "Asset ingested");

        Ok(IngestedAsset {
            asset_id,
            public_url,
            category: payload.category,
        })
    }
}
