use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::asset::{AssetId, IngestedAsset};

pub const DRY_RUN_MESSAGE: &str = "Dry run acknowledged";

/// Body of `POST /drive-sync/v1/upload`.
///
/// `fileName`, `mimeType` and `fileData` are required for a real upload but stay optional
/// here: a dry run is acknowledged without looking at them, so their presence is checked
/// by the decoder after the dry-run short-circuit.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Original file name, sanitized before use
    #[schema(example = "photo.png")]
    pub file_name: Option<String>,

    /// MIME type reported by the sender
    #[schema(example = "image/png")]
    pub mime_type: Option<String>,

    /// File content, standard base64 with padding
    #[schema(example = "UE5HREFUQQ==")]
    pub file_data: Option<String>,

    /// Optional category label passed through to the asset
    #[serde(default)]
    #[schema(example = "events")]
    pub category: String,

    /// Acknowledge the call without touching the filesystem or asset store
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub dry_run: bool,
}

/// Validated, decoded upload ready for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    /// Sanitized file name, may be empty if nothing safe was left
    pub file_name: String,
    pub mime_type: String,
    pub category: String,
    pub bytes: Vec<u8>,
}

/// What a request resolved to before the response is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    DryRun,
    Ingested(IngestedAsset),
}

/// Success body (201).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub attachment_id: AssetId,
    /// Public URL of the asset, null when it could not be resolved
    #[schema(example = "http://localhost:4000/media/2026/10/photo.png")]
    pub url: Option<String>,
    pub category: String,
}

impl From<IngestedAsset> for UploadResponse {
    fn from(asset: IngestedAsset) -> Self {
        Self {
            attachment_id: asset.asset_id,
            url: asset.public_url,
            category: asset.category,
        }
    }
}

/// Dry-run body (202).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DryRunResponse {
    #[schema(example = "Dry run acknowledged")]
    pub message: String,
}

impl Default for DryRunResponse {
    fn default() -> Self {
        Self {
            message: DRY_RUN_MESSAGE.to_string(),
        }
    }
}

/// Accepts JSON booleans as well as the string and numeric spellings form-encoded
/// senders tend to use ("true", "1", "yes", 0, 1). Null means false.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(false),
        serde_json::Value::Bool(b) => Ok(b),
        serde_json::Value::Number(n) => Ok(n.as_f64().map(|f| f != 0.0).unwrap_or(false)),
        serde_json::Value::String(s) => match s.trim().to_lowercase().as_str() {
            "" | "0" | "false" | "no" | "off" => Ok(false),
            "1" | "true" | "yes" | "on" => Ok(true),
            other => Err(D::Error::custom(format!("invalid boolean: {}", other))),
        },
        other => Err(D::Error::custom(format!("invalid boolean: {}", other))),
    }
}
