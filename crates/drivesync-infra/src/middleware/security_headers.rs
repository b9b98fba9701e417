use axum::extract::State;
use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};
use std::sync::Arc;

/// Security header settings, resolved once at startup.
#[derive(Debug, Clone, Default)]
pub struct SecurityHeadersConfig {
    /// Send HSTS; only meaningful behind HTTPS
    pub hsts: bool,
}

impl SecurityHeadersConfig {
    pub fn new(is_production: bool) -> Self {
        Self {
            hsts: is_production,
        }
    }
}

/// Security headers middleware
///
/// The service only returns JSON and stored media, so the content security policy denies
/// everything by default.
pub async fn security_headers_middleware(
    State(config): State<Arc<SecurityHeadersConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert("Referrer-Policy", HeaderValue::from_static("no-referrer"));

    if config.hsts {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static("default-src 'none'; img-src 'self'; frame-ancestors 'none'"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use axum_test::TestServer;

    fn app(config: SecurityHeadersConfig) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                Arc::new(config),
                security_headers_middleware,
            ))
    }

    #[tokio::test]
    async fn adds_baseline_headers() {
        let server = TestServer::new(app(SecurityHeadersConfig::new(false))).unwrap();
        let response = server.get("/").await;

        assert_eq!(response.header("x-content-type-options"), "nosniff");
        assert_eq!(response.header("x-frame-options"), "DENY");
        assert!(response.headers().get("strict-transport-security").is_none());
    }

    #[tokio::test]
    async fn hsts_only_in_production() {
        let server = TestServer::new(app(SecurityHeadersConfig::new(true))).unwrap();
        let response = server.get("/").await;
        assert!(response.headers().get("strict-transport-security").is_some());
    }
}
