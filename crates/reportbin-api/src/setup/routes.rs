//! Route configuration and setup

use crate::auth::{require_upload_password, UploadGate};
use crate::handlers;
use crate::state::AppState;
use crate::utils::upload::MULTIPART_OVERHEAD_BYTES;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{delete, get, patch, post},
    Json, Router,
};
use reportbin_core::constants::UPLOAD_PASSWORD_HEADER;
use reportbin_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(&state.config)?;
    let gate = Arc::new(UploadGate {
        upload_password: state.config.upload_password().to_string(),
    });

    let app = public_routes(state.clone())
        .merge(protected_routes(state.clone(), gate))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// Routes anyone may call.
fn public_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/manage", get(handlers::manage::manage_page))
        .route("/reports/{id}", get(handlers::public_report::view_report))
        .route("/api/health", get(handlers::health::health_check))
        .route("/api/diagnostics", get(handlers::health::diagnostics))
        .with_state(state)
}

/// Routes behind the upload password.
///
/// The gate is a route layer, so it runs before the multipart extractor and an
/// unauthenticated upload is rejected without its body being read.
fn protected_routes(state: Arc<AppState>, gate: Arc<UploadGate>) -> Router {
    let body_limit = DefaultBodyLimit::max(
        state
            .config
            .max_file_size_bytes()
            .saturating_add(MULTIPART_OVERHEAD_BYTES),
    );

    Router::new()
        .route(
            "/api/upload",
            post(handlers::upload::upload_report).layer(body_limit),
        )
        .route("/api/reports", get(handlers::reports::list_reports))
        .route(
            "/api/reports/{id}",
            delete(handlers::reports::delete_report),
        )
        .route(
            "/api/reports/{id}/disable",
            patch(handlers::reports::disable_report),
        )
        .route(
            "/api/reports/{id}/replace",
            post(handlers::reports::replace_report).layer(body_limit),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            gate,
            require_upload_password,
        ))
        .with_state(state)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [
        header::CONTENT_TYPE,
        HeaderName::from_static(UPLOAD_PASSWORD_HEADER),
    ];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
    };
    Ok(cors)
}
