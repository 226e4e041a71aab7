//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use reportbin_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reportbin API",
        version = "0.1.0",
        description = "Upload, replace, disable and delete HTML reports; view active reports publicly. Operator routes require the x-upload-password header."
    ),
    paths(
        handlers::upload::upload_report,
        handlers::reports::list_reports,
        handlers::reports::delete_report,
        handlers::reports::disable_report,
        handlers::reports::replace_report,
        handlers::public_report::view_report,
        handlers::manage::manage_page,
        handlers::health::health_check,
        handlers::health::diagnostics,
    ),
    components(schemas(
        models::Report,
        models::ReportStatus,
        models::UploadResponse,
        models::SuccessResponse,
        models::HealthResponse,
        models::DiagnosticsResponse,
        handlers::health::DiagnosticsErrorResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "reports", description = "Operator report management"),
        (name = "public", description = "Public report view and operator page"),
        (name = "health", description = "Liveness and storage diagnostics")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_every_route() {
        let spec = get_openapi_spec();
        for path in [
            "/api/upload",
            "/api/reports",
            "/api/reports/{id}",
            "/api/reports/{id}/disable",
            "/api/reports/{id}/replace",
            "/reports/{id}",
            "/manage",
            "/api/health",
            "/api/diagnostics",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
