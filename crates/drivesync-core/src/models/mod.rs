//! Domain models for the intake endpoint.

pub mod asset;
pub mod upload;

pub use asset::{AssetId, AssetMetadata, IngestedAsset};
pub use upload::{
    DecodedPayload, DryRunResponse, UploadOutcome, UploadRequest, UploadResponse,
    DRY_RUN_MESSAGE,
};
