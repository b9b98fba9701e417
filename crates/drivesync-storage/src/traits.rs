//! Asset store abstraction
//!
//! The intake pipeline never assumes a storage backend; it sideloads a file that already
//! sits on local disk through this trait and asks for the resulting public URL.

use async_trait::async_trait;
use drivesync_core::models::{AssetId, AssetMetadata};
use drivesync_core::AppError;
use std::path::Path;
use thiserror::Error;

/// Asset store errors. Each one knows the status and code reported to the uploader.
#[derive(Debug, Error)]
pub enum AssetStoreError {
    #[error("Sorry, this file type is not permitted: {0}")]
    UnsupportedType(String),

    #[error("File is empty")]
    EmptyFile,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Asset store rejected the file: {message}")]
    Rejected {
        status: Option<u16>,
        code: String,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AssetStoreError {
    /// HTTP status the failure should surface with, `None` lets the caller default.
    pub fn status(&self) -> Option<u16> {
        match self {
            AssetStoreError::UnsupportedType(_) => Some(415),
            AssetStoreError::EmptyFile => Some(400),
            AssetStoreError::FileTooLarge { .. } => Some(413),
            AssetStoreError::NotFound(_) => Some(404),
            AssetStoreError::InvalidKey(_) => Some(400),
            AssetStoreError::Rejected { status, .. } => *status,
            AssetStoreError::IoError(_) | AssetStoreError::ConfigError(_) => None,
        }
    }

    /// Machine-readable code for the uploader.
    pub fn code(&self) -> &str {
        match self {
            AssetStoreError::UnsupportedType(_) => "unsupported-file-type",
            AssetStoreError::EmptyFile => "empty-file",
            AssetStoreError::FileTooLarge { .. } => "file-too-large",
            AssetStoreError::NotFound(_) => "not-found",
            AssetStoreError::InvalidKey(_) => "invalid-key",
            AssetStoreError::Rejected { code, .. } => code,
            AssetStoreError::IoError(_) => "storage-error",
            AssetStoreError::ConfigError(_) => "storage-config-error",
        }
    }

    /// Message shown to the uploader.
    pub fn message(&self) -> String {
        match self {
            AssetStoreError::Rejected { message, .. } => message.clone(),
            AssetStoreError::IoError(_) => "The asset store could not save the file.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Registration failures surface to the uploader with the store's own status, code and message.
impl From<AssetStoreError> for AppError {
    fn from(err: AssetStoreError) -> Self {
        AppError::registration(err.status(), err.code(), err.message())
    }
}

/// Result type for asset store operations
pub type AssetStoreResult<T> = Result<T, AssetStoreError>;

/// Durable storage that assigns identifiers and URLs to files.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Register the file at `temp_path` as a managed asset.
    ///
    /// On success the store owns the bytes: it may move the file away or copy it, and the
    /// caller must not delete `temp_path` afterwards. On failure the file is left in
    /// place for the caller to clean up.
    async fn register_asset(
        &self,
        temp_path: &Path,
        file_name: &str,
        mime_type: &str,
        metadata: &AssetMetadata,
    ) -> AssetStoreResult<AssetId>;

    /// Public URL for an asset, `None` when the store cannot resolve one.
    async fn public_url(&self, asset_id: &AssetId) -> AssetStoreResult<Option<String>>;

    /// Cheap readiness probe.
    async fn health_check(&self) -> AssetStoreResult<()>;
}
