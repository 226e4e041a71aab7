//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use reportbin_core::Config;
use reportbin_storage::{create_backend, Backend};
use std::sync::Arc;

/// Build state and router from configuration, creating the configured backend.
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;

    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        app_url = %config.app_url(),
        "Configuration loaded and validated successfully"
    );

    let backend = create_backend(&config).context("Failed to initialize report store")?;
    build_app(config, backend)
}

/// Build state and router over an already constructed backend.
pub fn build_app(config: Config, backend: Backend) -> Result<(Arc<AppState>, axum::Router)> {
    let state = Arc::new(AppState::new(config, backend));
    let router = routes::setup_routes(state.clone())?;
    Ok((state, router))
}
