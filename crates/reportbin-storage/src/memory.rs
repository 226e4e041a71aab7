//! In-process backend.
//!
//! Holds objects and rows in memory behind one mutex. Used by the API tests and
//! for running the server without an external service (`STORAGE_BACKEND=memory`).
//! Individual operations can be made to fail to exercise partial-failure paths.

use crate::traits::{
    ObjectStorage, ReportRepository, ServiceProbe, StorageError, StorageResult,
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reportbin_core::models::{Report, ReportStatus, ReportUpdate};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

const SIGNED_URL_SCHEME: &str = "memory://";

/// Operations that can be forced to fail with [`MemoryBackend::fail_on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryOp {
    PutObject,
    SignUrl,
    FetchSigned,
    DeleteObject,
    InsertRow,
    ListRows,
    GetRow,
    UpdateRow,
    DeleteRow,
    Probe,
}

#[derive(Default)]
struct MemoryState {
    objects: HashMap<String, Bytes>,
    rows: Vec<Report>,
    failures: HashSet<MemoryOp>,
}

#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        // A panic while holding the lock cannot leave the maps half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(state: &MemoryState, op: MemoryOp) -> StorageResult<()> {
        if !state.failures.contains(&op) {
            return Ok(());
        }
        let message = format!("Injected failure for {:?}", op);
        Err(match op {
            MemoryOp::PutObject => StorageError::UploadFailed(message),
            MemoryOp::SignUrl => StorageError::SignFailed(message),
            MemoryOp::FetchSigned => StorageError::DownloadFailed(message),
            MemoryOp::DeleteObject => StorageError::DeleteFailed(message),
            MemoryOp::Probe => StorageError::Request(message),
            MemoryOp::InsertRow
            | MemoryOp::ListRows
            | MemoryOp::GetRow
            | MemoryOp::UpdateRow
            | MemoryOp::DeleteRow => StorageError::Database(message),
        })
    }

    /// Make every later call of `op` fail until [`MemoryBackend::clear_failures`].
    pub fn fail_on(&self, op: MemoryOp) {
        self.state().failures.insert(op);
    }

    pub fn clear_failures(&self) {
        self.state().failures.clear();
    }

    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.state().objects.get(key).cloned()
    }

    pub fn has_object(&self, key: &str) -> bool {
        self.state().objects.contains_key(key)
    }

    pub fn object_count(&self) -> usize {
        self.state().objects.len()
    }

    pub fn report(&self, id: Uuid) -> Option<Report> {
        self.state().rows.iter().find(|r| r.id == id).cloned()
    }

    pub fn report_count(&self) -> usize {
        self.state().rows.len()
    }

    /// Seed a row and its object directly, bypassing failure injection.
    pub fn seed(&self, report: Report, content: impl Into<Bytes>) {
        let mut state = self.state();
        state.objects.insert(report.file_path.clone(), content.into());
        state.rows.retain(|r| r.id != report.id);
        state.rows.push(report);
    }
}

#[async_trait]
impl ObjectStorage for MemoryBackend {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        _content_type: &str,
        overwrite: bool,
    ) -> StorageResult<()> {
        let mut state = self.state();
        Self::check(&state, MemoryOp::PutObject)?;
        if !overwrite && state.objects.contains_key(key) {
            return Err(StorageError::Conflict(
                "The resource already exists".to_string(),
            ));
        }
        tracing::debug!(key = %key, size_bytes = data.len(), "Memory object stored");
        state.objects.insert(key.to_string(), data);
        Ok(())
    }

    async fn signed_read_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let state = self.state();
        Self::check(&state, MemoryOp::SignUrl)?;
        if !state.objects.contains_key(key) {
            return Err(StorageError::SignFailed("Object not found".to_string()));
        }
        let expires_at = Utc::now().timestamp() + expires_in.as_secs() as i64;
        Ok(format!("{}{}?expires={}", SIGNED_URL_SCHEME, key, expires_at))
    }

    async fn fetch_signed(&self, signed_url: &str) -> StorageResult<Bytes> {
        let state = self.state();
        Self::check(&state, MemoryOp::FetchSigned)?;

        let rest = signed_url
            .strip_prefix(SIGNED_URL_SCHEME)
            .ok_or_else(|| StorageError::DownloadFailed(format!("Not a signed URL: {}", signed_url)))?;
        let (key, query) = rest.split_once('?').unwrap_or((rest, ""));
        let expires_at = query
            .strip_prefix("expires=")
            .and_then(|v| v.parse::<i64>().ok())
            .ok_or_else(|| StorageError::DownloadFailed("Signed URL has no expiry".to_string()))?;
        if Utc::now().timestamp() > expires_at {
            return Err(StorageError::DownloadFailed("Signed URL expired".to_string()));
        }

        state
            .objects
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        let mut state = self.state();
        Self::check(&state, MemoryOp::DeleteObject)?;
        state.objects.remove(key);
        Ok(())
    }
}

#[async_trait]
impl ReportRepository for MemoryBackend {
    async fn insert(&self, report: &Report) -> StorageResult<()> {
        let mut state = self.state();
        Self::check(&state, MemoryOp::InsertRow)?;
        if state.rows.iter().any(|r| r.id == report.id) {
            return Err(StorageError::Database(
                "duplicate key value violates unique constraint \"reports_pkey\"".to_string(),
            ));
        }
        state.rows.push(report.clone());
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<Report>> {
        let state = self.state();
        Self::check(&state, MemoryOp::ListRows)?;
        let mut rows = state.rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get(&self, id: Uuid, status: Option<ReportStatus>) -> StorageResult<Option<Report>> {
        let state = self.state();
        Self::check(&state, MemoryOp::GetRow)?;
        Ok(state
            .rows
            .iter()
            .find(|r| r.id == id && status.map_or(true, |s| r.status == s))
            .cloned())
    }

    async fn update(&self, id: Uuid, update: &ReportUpdate) -> StorageResult<()> {
        let mut state = self.state();
        Self::check(&state, MemoryOp::UpdateRow)?;
        if let Some(row) = state.rows.iter_mut().find(|r| r.id == id) {
            row.apply(update);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let mut state = self.state();
        Self::check(&state, MemoryOp::DeleteRow)?;
        state.rows.retain(|r| r.id != id);
        Ok(())
    }
}

#[async_trait]
impl ServiceProbe for MemoryBackend {
    fn service_url(&self) -> Option<&str> {
        None
    }

    async fn probe(&self) -> StorageResult<u16> {
        let state = self.state();
        Self::check(&state, MemoryOp::Probe)?;
        Ok(200)
    }
}
