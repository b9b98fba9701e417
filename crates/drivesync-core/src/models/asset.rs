use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Opaque identifier assigned by the asset store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct AssetId(pub Uuid);

impl AssetId {
    pub fn new() -> Self {
        AssetId(Uuid::new_v4())
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssetId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(AssetId)
    }
}

/// Supplementary metadata handed to the asset store alongside the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetMetadata {
    /// Free-form category label, empty when none was supplied
    pub category: String,
}

/// Result of a successful ingestion. The asset itself is owned by the asset store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedAsset {
    pub asset_id: AssetId,
    /// Absent when the store could not resolve a URL for the new asset
    pub public_url: Option<String>,
    pub category: String,
}
