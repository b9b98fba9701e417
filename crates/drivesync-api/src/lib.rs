//! DriveSync API Library
//!
//! The HTTP intake service: sync token authentication, payload decoding, temp file
//! staging, asset registration and response mapping.

mod api_doc;
pub mod constants;
mod handlers;
mod response;

pub mod auth;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use api_doc::get_openapi_spec;
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
