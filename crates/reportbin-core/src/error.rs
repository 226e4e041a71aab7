//! Error types module
//!
//! All failures a handler can produce are unified under the `AppError` enum.
//! Each variant belongs to exactly one `ErrorKind` of the taxonomy exposed to
//! callers: authorization, validation, not-found, upstream and unexpected errors.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for failures reported by the external service
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Coarse classification of every `AppError`, used by tests and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    Validation,
    NotFound,
    Upstream,
    Unexpected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Auth => "auth",
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Unexpected => "unexpected",
        }
    }
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UPSTREAM_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message rendered into `{"error": ...}`
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthorized(_) => ErrorKind::Auth,
            AppError::InvalidInput(_) | AppError::PayloadTooLarge(_) => ErrorKind::Validation,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Upstream(_) => ErrorKind::Upstream,
            AppError::Internal(_) | AppError::InternalWithSource { .. } => ErrorKind::Unexpected,
        }
    }

    /// Variant name for structured logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::NotFound(_) => "NotFound",
            AppError::Upstream(_) => "Upstream",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "InternalWithSource",
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::Unauthorized(_) => 401,
            AppError::InvalidInput(_) | AppError::PayloadTooLarge(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::Upstream(_) | AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                500
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "INTERNAL_ERROR",
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Unauthorized(_) => "Unauthorized".to_string(),
            AppError::InvalidInput(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::NotFound(msg)
            | AppError::Upstream(msg)
            | AppError::Internal(msg) => msg.clone(),
            AppError::InternalWithSource { message, .. } => message.clone(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self.kind() {
            ErrorKind::Auth | ErrorKind::Validation | ErrorKind::NotFound => LogLevel::Debug,
            ErrorKind::Upstream => LogLevel::Warn,
            ErrorKind::Unexpected => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_covers_taxonomy() {
        assert_eq!(AppError::Unauthorized("x".into()).kind(), ErrorKind::Auth);
        assert_eq!(AppError::InvalidInput("x".into()).kind(), ErrorKind::Validation);
        assert_eq!(AppError::PayloadTooLarge("x".into()).kind(), ErrorKind::Validation);
        assert_eq!(AppError::NotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(AppError::Upstream("x".into()).kind(), ErrorKind::Upstream);
        assert_eq!(AppError::Internal("x".into()).kind(), ErrorKind::Unexpected);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Unauthorized("bad".into()).http_status_code(), 401);
        assert_eq!(AppError::InvalidInput("bad".into()).http_status_code(), 400);
        assert_eq!(AppError::PayloadTooLarge("big".into()).http_status_code(), 400);
        assert_eq!(AppError::PayloadTooLarge("big".into()).error_code(), "PAYLOAD_TOO_LARGE");
        assert_eq!(AppError::NotFound("gone".into()).http_status_code(), 404);
        assert_eq!(AppError::Upstream("boom".into()).http_status_code(), 500);
        assert_eq!(AppError::Internal("boom".into()).http_status_code(), 500);
    }

    #[test]
    fn test_unauthorized_message_is_fixed() {
        let err = AppError::Unauthorized("header mismatch".into());
        assert_eq!(err.client_message(), "Unauthorized");
    }

    #[test]
    fn test_upstream_message_passes_through() {
        let err = AppError::Upstream("The resource already exists".into());
        assert_eq!(err.client_message(), "The resource already exists");
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_from_anyhow_is_unexpected() {
        let err: AppError = anyhow::anyhow!("socket closed").into();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert_eq!(err.client_message(), "socket closed");
    }
}
