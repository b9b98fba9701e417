use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use drivesync_core::models::{DecodedPayload, UploadRequest};
use drivesync_core::validation::{sanitize_file_name, sanitize_text_field};
use drivesync_core::AppError;

pub const INVALID_BASE64_MESSAGE: &str = "fileData must be valid base64.";

#[derive(Debug, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// `dryRun` was set; nothing else in the request was looked at
    DryRun,
    Ready(DecodedPayload),
}

fn required(value: Option<String>, field: &'static str) -> Result<String, AppError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(AppError::MissingField(field))
}

/// Validate and decode an upload request. Pure: no filesystem or store access.
///
/// Base64 decoding is strict: standard alphabet, canonical padding, no whitespace.
pub fn decode(raw: UploadRequest) -> Result<DecodeOutcome, AppError> {
    if raw.dry_run {
        return Ok(DecodeOutcome::DryRun);
    }

    let file_name = required(raw.file_name, "fileName")?;
    let mime_type = required(raw.mime_type, "mimeType")?;
    let file_data = required(raw.file_data, "fileData")?;

    let bytes = STANDARD
        .decode(file_data.as_bytes())
        .map_err(|_| AppError::InvalidPayload(INVALID_BASE64_MESSAGE.to_string()))?;

    Ok(DecodeOutcome::Ready(DecodedPayload {
        file_name: sanitize_file_name(&file_name),
        mime_type: sanitize_text_field(&mime_type),
        category: sanitize_text_field(&raw.category),
        bytes,
    }))
}
