use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::response::UploadReply;
use crate::services::ingest::{decode, DecodeOutcome, IngestionPipeline};
use crate::state::AppState;
use axum::extract::State;
use drivesync_core::models::{DryRunResponse, UploadOutcome, UploadRequest, UploadResponse};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/drive-sync/v1/upload",
    tag = "upload",
    request_body = UploadRequest,
    params(
        ("X-Drive-Sync-Token" = String, Header, description = "Shared sync token")
    ),
    responses(
        (status = 201, description = "Asset registered", body = UploadResponse),
        (status = 202, description = "Dry run acknowledged", body = DryRunResponse),
        (status = 400, description = "Missing field or invalid base64", body = ErrorResponse),
        (status = 401, description = "Invalid or missing sync token", body = ErrorResponse),
        (status = 500, description = "Temp file failure, or asset store failure without a status", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "upload", dry_run = request.dry_run))]
pub async fn upload(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UploadRequest>,
) -> Result<UploadReply, HttpAppError> {
    let payload = match decode(request)? {
        DecodeOutcome::DryRun => {
            tracing::debug!("Dry run acknowledged");
            return Ok(UploadReply(UploadOutcome::DryRun));
        }
        DecodeOutcome::Ready(payload) => payload,
    };

    let asset = IngestionPipeline::from_state(&state).ingest(payload).await?;
    Ok(UploadReply(UploadOutcome::Ingested(asset)))
}
