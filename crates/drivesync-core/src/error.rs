//! Error types module
//!
//! All failures of the intake pipeline are unified under [`AppError`]. Each variant
//! belongs to one class of the taxonomy: authentication, validation of client input,
//! local resource failures (temp file, disk) and downstream asset store failures whose
//! status and code are passed through to the caller.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for rejected requests and downstream refusals
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "invalid-token")
    fn error_code(&self) -> &str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid or missing sync token")]
    InvalidToken,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid request body: {0}")]
    InvalidRequestBody(String),

    #[error("Unable to create temporary file: {0}")]
    TempAllocation(#[source] io::Error),

    #[error("Unable to write temporary file: {0}")]
    TempWrite(#[source] io::Error),

    #[error("Asset registration failed ({code}): {message}")]
    Registration {
        status: Option<u16>,
        code: String,
        message: String,
    },
}

/// Status used when the asset store reports a failure without one.
pub const DEFAULT_REGISTRATION_STATUS: u16 = 500;

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
/// Registration errors carry their own status and code and are resolved separately.
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::InvalidToken => (401, "invalid-token", false, LogLevel::Warn),
        AppError::InvalidPayload(_) => (400, "invalid-payload", false, LogLevel::Debug),
        AppError::MissingField(_) => (400, "missing-field", false, LogLevel::Debug),
        AppError::InvalidRequestBody(_) => (400, "invalid-request", false, LogLevel::Debug),
        AppError::TempAllocation(_) => (500, "temp-error", true, LogLevel::Error),
        AppError::TempWrite(_) => (500, "write-error", true, LogLevel::Error),
        AppError::Registration { .. } => (
            DEFAULT_REGISTRATION_STATUS,
            "registration-failed",
            false,
            LogLevel::Warn,
        ),
    }
}

impl AppError {
    /// Build a registration error from the asset store's reported failure.
    pub fn registration(
        status: Option<u16>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        AppError::Registration {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidToken => "InvalidToken",
            AppError::InvalidPayload(_) => "InvalidPayload",
            AppError::MissingField(_) => "MissingField",
            AppError::InvalidRequestBody(_) => "InvalidRequestBody",
            AppError::TempAllocation(_) => "TempAllocation",
            AppError::TempWrite(_) => "TempWrite",
            AppError::Registration { .. } => "Registration",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::Registration { status, .. } => status
                .filter(|s| (400..=599).contains(s))
                .unwrap_or(DEFAULT_REGISTRATION_STATUS),
            _ => app_error_static_metadata(self).0,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            AppError::Registration { code, .. } if !code.is_empty() => code,
            _ => app_error_static_metadata(self).1,
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidToken => "Invalid or missing sync token.".to_string(),
            AppError::InvalidPayload(ref msg) => msg.clone(),
            AppError::MissingField(field) => format!("Missing parameter: {}", field),
            AppError::InvalidRequestBody(ref msg) => msg.clone(),
            AppError::TempAllocation(_) => "Unable to create temporary file.".to_string(),
            AppError::TempWrite(_) => "Unable to write temporary file.".to_string(),
            AppError::Registration { ref message, .. } => message.clone(),
        }
    }
}
