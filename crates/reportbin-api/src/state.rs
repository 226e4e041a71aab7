//! Application state shared by all handlers.

use reportbin_core::Config;
use reportbin_storage::{Backend, ObjectStorage, ReportRepository, ServiceProbe};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub objects: Arc<dyn ObjectStorage>,
    pub reports: Arc<dyn ReportRepository>,
    pub probe: Arc<dyn ServiceProbe>,
}

impl AppState {
    pub fn new(config: Config, backend: Backend) -> Self {
        AppState {
            config,
            objects: backend.objects,
            reports: backend.reports,
            probe: backend.probe,
        }
    }
}
