//! DriveSync Core Library
//!
//! Configuration, error types, domain models, token handling and input sanitization
//! shared by the intake service, its storage backends and the CLI.

pub mod config;
pub mod error;
pub mod models;
pub mod token;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, LogFormat, ServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use token::{
    ensure_sync_token, generate_sync_token, regenerate_sync_token, TokenProvider, TokenResult,
    TokenStoreError,
};
