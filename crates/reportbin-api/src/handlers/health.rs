//! Health and diagnostics handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use reportbin_core::models::{DiagnosticsResponse, HealthResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsErrorResponse {
    pub status: String,
    pub error: String,
    pub service_url: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Process is up", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Issue one request to the storage service and report what came back.
/// Any HTTP status counts as reachable.
#[utoipa::path(
    get,
    path = "/api/diagnostics",
    tag = "health",
    responses(
        (status = 200, description = "Storage service reachable", body = DiagnosticsResponse),
        (status = 500, description = "Storage service unreachable", body = DiagnosticsErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "diagnostics"))]
pub async fn diagnostics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let service_url = state.probe.service_url().map(str::to_string);
    tracing::debug!(service_url = ?service_url, "Running storage diagnostics");

    match state.probe.probe().await {
        Ok(response_status) => (
            StatusCode::OK,
            Json(DiagnosticsResponse {
                status: "ok".to_string(),
                service_url,
                response_status,
                message: "Successfully connected to the storage service".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Storage service unreachable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DiagnosticsErrorResponse {
                    status: "error".to_string(),
                    error: e.message().to_string(),
                    service_url,
                }),
            )
                .into_response()
        }
    }
}
