//! DriveSync Infrastructure Library
//!
//! Shared plumbing for the intake service:
//! - Middleware (request ID, security headers)
//! - Tracing subscriber initialization

pub mod middleware;
pub mod telemetry;

// Re-export commonly used types
pub use middleware::{
    request_id_middleware, security_headers_middleware, RequestId,
    SecurityHeadersConfig,
};
pub use telemetry::{init_telemetry, shutdown_telemetry};
