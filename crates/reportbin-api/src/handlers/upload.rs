use crate::error::{ErrorResponse, HttpAppError};
use crate::services::ReportLifecycle;
use crate::state::AppState;
use crate::utils::upload::{extract_report_file, require_multipart, NO_FILE_MESSAGE};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use reportbin_core::models::UploadResponse;
use reportbin_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "reports",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "One HTML file in the `file` field"),
    params(
        ("x-upload-password" = String, Header, description = "Shared upload secret")
    ),
    responses(
        (status = 200, description = "Report stored", body = UploadResponse),
        (status = 400, description = "No file, not HTML or file too large", body = ErrorResponse),
        (status = 401, description = "Bad or missing upload password", body = ErrorResponse),
        (status = 500, description = "Storage service error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_report"))]
pub async fn upload_report(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let multipart = require_multipart(multipart)?;
    let file = extract_report_file(multipart, state.config.max_file_size_bytes())
        .await?
        .ok_or_else(|| AppError::InvalidInput(NO_FILE_MESSAGE.to_string()))?;

    tracing::debug!(
        filename = %file.original_filename,
        size_bytes = file.data.len(),
        "Received report upload"
    );

    let report = ReportLifecycle::from_state(&state).upload(file).await?;

    Ok(Json(UploadResponse {
        success: true,
        report_id: report.id,
        public_url: report.public_url,
        filename: report.original_filename,
    }))
}
