//! Public report view.
//!
//! The bytes are fetched through a signed URL and sent back from this process, so
//! the storage location never reaches the viewer.

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::parse_report_id;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use reportbin_core::models::ReportStatus;
use reportbin_core::AppError;
use std::sync::Arc;
use std::time::Duration;

const HTML_RESPONSE_CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[utoipa::path(
    get,
    path = "/reports/{id}",
    tag = "public",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report HTML", body = String, content_type = "text/html"),
        (status = 404, description = "Report not found or disabled", body = ErrorResponse),
        (status = 500, description = "Storage service error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(report_id = %id, operation = "view_report"))]
pub async fn view_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, HttpAppError> {
    let id = parse_report_id(&id)?;

    let report = state
        .reports
        .get(id, Some(ReportStatus::Active))
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "Report lookup failed");
            AppError::NotFound("Report not found".to_string())
        })?
        .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

    let ttl = Duration::from_secs(state.config.signed_url_ttl_secs());
    let signed_url = state
        .objects
        .signed_read_url(&report.file_path, ttl)
        .await?;
    let html = state.objects.fetch_signed(&signed_url).await?;

    tracing::debug!(size_bytes = html.len(), "Serving report");
    Ok(([(header::CONTENT_TYPE, HTML_RESPONSE_CONTENT_TYPE)], html).into_response())
}
