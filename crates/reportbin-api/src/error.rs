//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Every `AppError`
//! renders as `{"error": message}` with the status from `ErrorMetadata`.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reportbin_core::{AppError, ErrorMetadata, LogLevel};
use reportbin_storage::StorageError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: both IntoResponse and AppError are foreign to this crate)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl HttpAppError {
    pub fn kind(&self) -> reportbin_core::ErrorKind {
        self.0.kind()
    }
}

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let kind = error.kind().as_str();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, kind, "Request rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, kind, "Storage service error");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type, kind, "Unexpected error");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = Json(ErrorResponse {
            error: app_error.client_message(),
        });
        (status, body).into_response()
    }
}

/// Storage failures keep the service's own message for the client.
pub fn storage_to_app_error(err: StorageError) -> AppError {
    match err {
        StorageError::ConfigError(msg) => AppError::Internal(msg),
        other => AppError::Upstream(other.message().to_string()),
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(storage_to_app_error(err))
    }
}

/// Multipart read failures. A body over the limit keeps its own variant; both answer 400.
pub fn multipart_to_app_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportbin_core::ErrorKind;

    #[test]
    fn test_storage_errors_are_upstream_with_service_message() {
        let err = HttpAppError::from(StorageError::UploadFailed("Bucket not found".into()));
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert_eq!(err.0.client_message(), "Bucket not found");
        assert_eq!(err.0.http_status_code(), 500);
    }

    #[test]
    fn test_conflict_is_upstream() {
        let err = HttpAppError::from(StorageError::Conflict("The resource already exists".into()));
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }

    #[test]
    fn test_config_error_is_unexpected() {
        let err = HttpAppError::from(StorageError::ConfigError("no client".into()));
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }

    #[test]
    fn test_response_shape() {
        let response = HttpAppError(AppError::NotFound("Report not found".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unauthorized_hides_detail() {
        let response =
            HttpAppError(AppError::Unauthorized("header mismatch".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
