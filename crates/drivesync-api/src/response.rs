//! Success responses of the upload route. Failures render through [`crate::error::HttpAppError`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use drivesync_core::models::{DryRunResponse, UploadOutcome, UploadResponse};

/// `UploadOutcome` rendered as 202 (dry run) or 201 (ingested).
#[derive(Debug)]
pub struct UploadReply(pub UploadOutcome);

impl IntoResponse for UploadReply {
    fn into_response(self) -> Response {
        match self.0 {
            UploadOutcome::DryRun => {
                (StatusCode::ACCEPTED, Json(DryRunResponse::default())).into_response()
            }
            UploadOutcome::Ingested(asset) => {
                (StatusCode::CREATED, Json(UploadResponse::from(asset))).into_response()
            }
        }
    }
}
