use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub sync_token: String,
    pub asset_store: String,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "alive"
        })),
    )
}

/// Readiness probe - a sync token exists and the asset store is usable
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready to accept uploads", body = ReadinessResponse),
        (status = 503, description = "Not ready", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut response = ReadinessResponse {
        status: "ready".to_string(),
        sync_token: "unknown".to_string(),
        asset_store: "unknown".to_string(),
    };
    let mut ready = true;

    match tokio::time::timeout(CHECK_TIMEOUT, state.token_provider.get()).await {
        Ok(Ok(Some(_))) => response.sync_token = "ready".to_string(),
        Ok(Ok(None)) => {
            response.sync_token = "missing".to_string();
            ready = false;
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Token store readiness check failed");
            response.sync_token = "unavailable".to_string();
            ready = false;
        }
        Err(_) => {
            tracing::error!("Token store readiness check timed out");
            response.sync_token = "timeout".to_string();
            ready = false;
        }
    }

    match tokio::time::timeout(CHECK_TIMEOUT, state.asset_store.health_check()).await {
        Ok(Ok(())) => response.asset_store = "ready".to_string(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Asset store readiness check failed");
            response.asset_store = format!("not_ready: {}", e);
            ready = false;
        }
        Err(_) => {
            tracing::error!("Asset store readiness check timed out");
            response.asset_store = "timeout".to_string();
            ready = false;
        }
    }

    let status_code = if ready {
        StatusCode::OK
    } else {
        response.status = "not_ready".to_string();
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
