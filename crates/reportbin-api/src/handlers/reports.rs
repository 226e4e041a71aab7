//! Operator endpoints over existing reports. All of them sit behind the upload gate.

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::parse_report_id;
use crate::services::ReportLifecycle;
use crate::state::AppState;
use crate::utils::upload::{extract_report_file, require_multipart, NO_FILE_MESSAGE};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};
use reportbin_core::models::{Report, ReportUpdate, SuccessResponse};
use reportbin_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "reports",
    params(
        ("x-upload-password" = String, Header, description = "Shared upload secret")
    ),
    responses(
        (status = 200, description = "All reports, newest first", body = Vec<Report>),
        (status = 401, description = "Bad or missing upload password", body = ErrorResponse),
        (status = 500, description = "Storage service error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_reports"))]
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Report>>, HttpAppError> {
    let reports = state.reports.list().await?;
    tracing::debug!(count = reports.len(), "Listed reports");
    Ok(Json(reports))
}

#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    tag = "reports",
    params(
        ("id" = String, Path, description = "Report ID"),
        ("x-upload-password" = String, Header, description = "Shared upload secret")
    ),
    responses(
        (status = 200, description = "Report deleted", body = SuccessResponse),
        (status = 401, description = "Bad or missing upload password", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse),
        (status = 500, description = "Storage service error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(report_id = %id, operation = "delete_report"))]
pub async fn delete_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, HttpAppError> {
    let id = parse_report_id(&id)?;
    ReportLifecycle::from_state(&state).delete(id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Flip the row to `disabled`. An id with no row still answers success.
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/disable",
    tag = "reports",
    params(
        ("id" = String, Path, description = "Report ID"),
        ("x-upload-password" = String, Header, description = "Shared upload secret")
    ),
    responses(
        (status = 200, description = "Report disabled", body = SuccessResponse),
        (status = 401, description = "Bad or missing upload password", body = ErrorResponse),
        (status = 500, description = "Storage service error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(report_id = %id, operation = "disable_report"))]
pub async fn disable_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, HttpAppError> {
    let id = parse_report_id(&id)?;
    state.reports.update(id, &ReportUpdate::disable()).await?;
    tracing::info!(report_id = %id, "Report disabled");
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/api/reports/{id}/replace",
    tag = "reports",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "One HTML file in the `file` field"),
    params(
        ("id" = String, Path, description = "Report ID"),
        ("x-upload-password" = String, Header, description = "Shared upload secret")
    ),
    responses(
        (status = 200, description = "Report content replaced", body = SuccessResponse),
        (status = 400, description = "No file, not HTML or file too large", body = ErrorResponse),
        (status = 401, description = "Bad or missing upload password", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse),
        (status = 500, description = "Storage service error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(report_id = %id, operation = "replace_report"))]
pub async fn replace_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SuccessResponse>, HttpAppError> {
    let id = parse_report_id(&id)?;
    let multipart = require_multipart(multipart)?;
    let file = extract_report_file(multipart, state.config.max_file_size_bytes())
        .await?
        .ok_or_else(|| AppError::InvalidInput(NO_FILE_MESSAGE.to_string()))?;

    ReportLifecycle::from_state(&state).replace(id, file).await?;
    Ok(Json(SuccessResponse::ok()))
}
