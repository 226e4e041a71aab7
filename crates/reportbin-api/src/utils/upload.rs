//! Upload intake: one HTML file field from a multipart body.

use crate::error::multipart_to_app_error;
use axum::extract::{multipart::MultipartRejection, Multipart};
use bytes::{Bytes, BytesMut};
use reportbin_core::constants::HTML_CONTENT_TYPE;
use reportbin_core::AppError;

/// Name of the multipart field carrying the report.
pub const FILE_FIELD: &str = "file";

/// Client message for a request that carries no report file.
pub const NO_FILE_MESSAGE: &str = "No file provided";

/// Extra body allowance on top of the file ceiling for multipart framing.
pub const MULTIPART_OVERHEAD_BYTES: usize = 16 * 1024;

#[derive(Debug)]
pub struct UploadedFile {
    pub data: Bytes,
    pub original_filename: String,
}

/// Normalize MIME type by stripping parameters (e.g. "text/html; charset=utf-8" -> "text/html").
fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

pub fn validate_content_type(content_type: Option<&str>) -> Result<(), AppError> {
    match content_type.map(normalize_mime_type) {
        Some(ct) if ct == HTML_CONTENT_TYPE => Ok(()),
        _ => Err(AppError::InvalidInput(
            "Only HTML files are allowed".to_string(),
        )),
    }
}

pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} bytes",
            max_size
        )));
    }
    Ok(())
}

/// Accept the multipart extractor's outcome. A body that is not
/// `multipart/form-data` (missing or bad boundary, no body at all) carries no file.
pub fn require_multipart(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Multipart, AppError> {
    multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Request body is not multipart");
        AppError::InvalidInput(NO_FILE_MESSAGE.to_string())
    })
}

/// Read the `file` field, if present.
///
/// The declared content type is checked before any byte of the field is read.
/// `Ok(None)` means the body carried no file; the caller decides how to report it.
pub async fn extract_report_file(
    mut multipart: Multipart,
    max_size: usize,
) -> Result<Option<UploadedFile>, AppError> {
    let mut uploaded: Option<UploadedFile> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(multipart_to_app_error)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if uploaded.is_some() {
            return Err(AppError::InvalidInput(
                "Only one file may be uploaded per request".to_string(),
            ));
        }

        validate_content_type(field.content_type())?;
        let original_filename = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "unknown".to_string());

        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_to_app_error)? {
            validate_file_size(data.len() + chunk.len(), max_size)?;
            data.extend_from_slice(&chunk);
        }

        uploaded = Some(UploadedFile {
            data: data.freeze(),
            original_filename,
        });
    }

    Ok(uploaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportbin_core::ErrorKind;

    #[test]
    fn test_html_accepted_with_parameters() {
        assert!(validate_content_type(Some("text/html")).is_ok());
        assert!(validate_content_type(Some("text/html; charset=utf-8")).is_ok());
        assert!(validate_content_type(Some("TEXT/HTML")).is_ok());
    }

    #[test]
    fn test_other_types_rejected() {
        for ct in ["text/plain", "application/xhtml+xml", "text/htmlx"] {
            let err = validate_content_type(Some(ct)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert!(validate_content_type(None).is_err());
    }

    #[test]
    fn test_file_size_limit() {
        assert!(validate_file_size(10, 10).is_ok());
        let err = validate_file_size(11, 10).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }
}
