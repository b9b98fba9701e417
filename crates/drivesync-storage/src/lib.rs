//! DriveSync Storage Library
//!
//! This crate provides the asset store abstraction the intake pipeline registers files
//! with, a local filesystem implementation of it, and the persisted sync token stores.
//!
//! # Local layout
//!
//! Under the configured root:
//!
//! - `media/{YYYY}/{MM}/{file_name}`: stored asset bytes, served under the base URL
//! - `index/{asset_id}.json`: one record per registered asset
//!
//! Storage keys are the path below `media/` and must not contain `..` or a leading `/`.

pub mod factory;
pub mod local;
pub mod mime;
pub mod token_store;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_asset_store, create_token_store};
pub use local::{AssetRecord, LocalAssetStore};
pub use token_store::{FileTokenStore, InMemoryTokenStore};
pub use traits::{AssetStore, AssetStoreError, AssetStoreResult};
