//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use drivesync_core::models::{AssetId, DryRunResponse, UploadRequest, UploadResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "DriveSync Intake API",
        version = "0.1.0",
        description = "Token-authenticated intake endpoint that registers base64 encoded files as media assets."
    ),
    paths(
        handlers::upload::upload,
        handlers::health::liveness_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        UploadRequest,
        UploadResponse,
        DryRunResponse,
        AssetId,
        ErrorResponse,
        handlers::health::ReadinessResponse,
    )),
    tags(
        (name = "upload", description = "File intake"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
