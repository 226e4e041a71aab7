#[cfg(feature = "backend-memory")]
use crate::MemoryBackend;
#[cfg(feature = "backend-supabase")]
use crate::SupabaseBackend;
use crate::{ObjectStorage, ReportRepository, ServiceProbe, StorageBackend, StorageError, StorageResult};
use reportbin_core::Config;
use std::sync::Arc;

/// The three faces of one configured backend.
#[derive(Clone)]
pub struct Backend {
    pub objects: Arc<dyn ObjectStorage>,
    pub reports: Arc<dyn ReportRepository>,
    pub probe: Arc<dyn ServiceProbe>,
}

impl Backend {
    /// Share a single implementation across all three traits.
    pub fn from_shared<B>(backend: B) -> Self
    where
        B: ObjectStorage + ReportRepository + ServiceProbe + 'static,
    {
        let shared = Arc::new(backend);
        Backend {
            objects: shared.clone(),
            reports: shared.clone(),
            probe: shared,
        }
    }
}

/// Create the report store backend selected by configuration
pub fn create_backend(config: &Config) -> StorageResult<Backend> {
    match config.storage_backend() {
        #[cfg(feature = "backend-supabase")]
        StorageBackend::Supabase => {
            let url = config.service_url().ok_or_else(|| {
                StorageError::ConfigError("SUPABASE_URL not configured".to_string())
            })?;
            let key = config.service_key().ok_or_else(|| {
                StorageError::ConfigError("SUPABASE_ANON_KEY not configured".to_string())
            })?;
            let bucket = config.storage_bucket().ok_or_else(|| {
                StorageError::ConfigError("STORAGE_BUCKET not configured".to_string())
            })?;

            let backend = SupabaseBackend::new(url, key, bucket, config.reports_table())?;
            Ok(Backend::from_shared(backend))
        }

        #[cfg(not(feature = "backend-supabase"))]
        StorageBackend::Supabase => Err(StorageError::ConfigError(
            "Supabase backend not available (backend-supabase feature not enabled)".to_string(),
        )),

        #[cfg(feature = "backend-memory")]
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory report store; contents are lost on restart");
            Ok(Backend::from_shared(MemoryBackend::new()))
        }

        #[cfg(not(feature = "backend-memory"))]
        StorageBackend::Memory => Err(StorageError::ConfigError(
            "Memory backend not available (backend-memory feature not enabled)".to_string(),
        )),
    }
}
