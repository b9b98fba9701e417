use crate::auth::token::{authenticate, AuthDecision};
use crate::constants::SYNC_TOKEN_HEADER;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use drivesync_core::AppError;
use std::sync::Arc;

/// Rejects requests without a valid `X-Drive-Sync-Token` before the body is read.
pub async fn sync_token_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(SYNC_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok());

    match authenticate(state.token_provider.as_ref(), provided).await {
        AuthDecision::Allow => next.run(request).await,
        AuthDecision::Deny => {
            tracing::warn!(
                path = %request.uri().path(),
                token_present = provided.is_some(),
                "Sync token rejected"
            );
            HttpAppError(AppError::InvalidToken).into_response()
        }
    }
}
