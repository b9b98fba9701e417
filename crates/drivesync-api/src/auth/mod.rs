//! Sync token authentication for the upload route.

pub mod middleware;
pub mod token;

pub use middleware::sync_token_middleware;
pub use token::{authenticate, AuthDecision};
