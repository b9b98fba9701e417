//! HTTP client for the DriveSync upload endpoint.
//!
//! Wraps `POST /drive-sync/v1/upload`: base64-encodes a file, sends it with the sync token
//! header and maps the reply to [`PushOutcome`]. Used by the `drivesync push` command and
//! by automation that drives the endpoint from Rust.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use drivesync_core::models::{DryRunResponse, UploadResponse};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Path prefix of the versioned API.
pub const API_PREFIX: &str = "/drive-sync/v1";

/// Header carrying the shared secret.
pub const SYNC_TOKEN_HEADER: &str = "X-Drive-Sync-Token";

const DEFAULT_URL: &str = "http://localhost:4000";

/// Error reply from the service, decoded from its `{code, message}` body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Upload failed with status {status} ({code}): {message}")]
pub struct ApiError {
    pub status: u16,
    pub code: String,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// JSON body of an upload call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBody<'a> {
    pub file_name: &'a str,
    pub mime_type: &'a str,
    pub file_data: String,
    pub category: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
}

impl<'a> UploadBody<'a> {
    pub fn new(file_name: &'a str, mime_type: &'a str, bytes: &[u8], category: &'a str) -> Self {
        Self {
            file_name,
            mime_type,
            file_data: STANDARD.encode(bytes),
            category,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Successful reply to an upload call.
#[derive(Debug, Clone)]
pub enum PushOutcome {
    /// 201: the asset was registered
    Created(UploadResponse),
    /// 202: dry run acknowledged
    Acknowledged(DryRunResponse),
}

#[derive(Clone, Debug)]
pub struct SyncClient {
    client: Client,
    base_url: String,
    token: String,
}

impl SyncClient {
    pub fn new(base_url: String, token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Create client from environment: DRIVESYNC_URL (default http://localhost:4000) and
    /// DRIVESYNC_TOKEN.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("DRIVESYNC_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        let token = std::env::var("DRIVESYNC_TOKEN")
            .context("Missing sync token. Set DRIVESYNC_TOKEN")?;

        Self::new(base_url, token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send `body` to the upload endpoint.
    ///
    /// Non-success replies come back as an [`ApiError`] inside the `anyhow::Error`, so
    /// callers can `downcast_ref` to inspect the status and code.
    pub async fn upload(&self, body: &UploadBody<'_>) -> Result<PushOutcome> {
        let url = self.build_url(&format!("{}/upload", API_PREFIX));
        let response = self
            .client
            .post(&url)
            .header(SYNC_TOKEN_HEADER, self.token.as_str())
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        match response.status() {
            StatusCode::CREATED => Ok(PushOutcome::Created(
                response
                    .json()
                    .await
                    .context("Failed to parse response as JSON")?,
            )),
            StatusCode::ACCEPTED => Ok(PushOutcome::Acknowledged(
                response
                    .json()
                    .await
                    .context("Failed to parse response as JSON")?,
            )),
            status => {
                let text = response.text().await.unwrap_or_default();
                Err(api_error(status, &text).into())
            }
        }
    }

    /// Upload raw bytes, encoding them on the way.
    pub async fn push_bytes(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
        category: &str,
        dry_run: bool,
    ) -> Result<PushOutcome> {
        let body = UploadBody::new(file_name, mime_type, bytes, category).dry_run(dry_run);
        self.upload(&body).await
    }

    /// Liveness probe. Returns the `status` field of `/health`.
    pub async fn health(&self) -> Result<String> {
        let response = self
            .client
            .get(self.build_url("/health"))
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("Health check failed with status {}", status));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse response as JSON")?;
        Ok(body["status"].as_str().unwrap_or_default().to_string())
    }
}

fn api_error(status: StatusCode, text: &str) -> ApiError {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => ApiError {
            status: status.as_u16(),
            code: body.code,
            message: body.message,
        },
        Err(_) => ApiError {
            status: status.as_u16(),
            code: String::new(),
            message: if text.is_empty() {
                "Unknown error".to_string()
            } else {
                text.to_string()
            },
        },
    }
}
