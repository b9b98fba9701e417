//! Route configuration and setup

use crate::api_doc::get_openapi_spec;
use crate::auth::sync_token_middleware;
use crate::constants::{API_PREFIX, MEDIA_PREFIX};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use drivesync_core::Config;
use drivesync_infra::{request_id_middleware, security_headers_middleware, SecurityHeadersConfig};
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    let mut app = public_routes()
        .merge(upload_routes(config, state.clone()))
        .with_state(state.clone());

    match state.media_root.as_ref() {
        Some(root) => {
            tracing::info!(path = %root.display(), prefix = MEDIA_PREFIX, "Serving stored media");
            app = app.nest_service(MEDIA_PREFIX, ServeDir::new(root));
        }
        None => tracing::debug!("Media serving disabled"),
    }

    let security_headers_config = Arc::new(SecurityHeadersConfig::new(config.is_production()));

    app.layer(TimeoutLayer::new(Duration::from_secs(
        config.request_timeout_secs(),
    )))
    .layer(TraceLayer::new_for_http())
    .layer(axum::middleware::from_fn(request_id_middleware))
    .layer(axum::middleware::from_fn_with_state(
        security_headers_config,
        security_headers_middleware,
    ))
}

/// Public routes (no authentication required)
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::liveness_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route(
            &format!("{}/openapi.json", API_PREFIX),
            get(|| async { Json(get_openapi_spec()) }),
        )
}

/// Upload route. The token check wraps the body limit so an unauthenticated caller gets
/// 401 before anything about the body is looked at. Route layers only, so unmatched
/// paths still fall through to 404.
fn upload_routes(config: &Config, state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/upload", API_PREFIX),
            post(handlers::upload::upload),
        )
        .route_layer(DefaultBodyLimit::disable())
        .route_layer(RequestBodyLimitLayer::new(config.max_request_body_bytes()))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            sync_token_middleware,
        ))
}
