//! Storage abstraction traits
//!
//! The external service offers two things: keyed blob storage and a metadata
//! table. They are modelled as separate traits so handlers only depend on what
//! they use, even though one backend usually implements both.

use async_trait::async_trait;
use bytes::Bytes;
use reportbin_core::models::{Report, ReportStatus, ReportUpdate};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Storage operation errors
///
/// Every variant carries the message reported by the external service so it can
/// be passed through to the client.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// `put_object` without overwrite hit an existing key.
    #[error("Object already exists: {0}")]
    Conflict(String),

    #[error("Signed URL creation failed: {0}")]
    SignFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Request to storage service failed: {0}")]
    Request(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// The service-reported message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            StorageError::UploadFailed(msg)
            | StorageError::Conflict(msg)
            | StorageError::SignFailed(msg)
            | StorageError::DownloadFailed(msg)
            | StorageError::DeleteFailed(msg)
            | StorageError::NotFound(msg)
            | StorageError::Database(msg)
            | StorageError::Request(msg)
            | StorageError::ConfigError(msg) => msg,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Keyed blob storage.
///
/// No method retries; each is a single round trip to the service.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` under `key`. With `overwrite == false` an existing key fails
    /// with [`StorageError::Conflict`].
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        overwrite: bool,
    ) -> StorageResult<()>;

    /// Time-limited URL from which the object can be read without credentials.
    async fn signed_read_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Read the bytes behind a URL returned by [`ObjectStorage::signed_read_url`].
    async fn fetch_signed(&self, signed_url: &str) -> StorageResult<Bytes>;

    /// Remove an object. Removing a missing key is not an error.
    async fn delete_object(&self, key: &str) -> StorageResult<()>;
}

/// CRUD on the `reports` metadata table.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn insert(&self, report: &Report) -> StorageResult<()>;

    /// All rows, newest `created_at` first.
    async fn list(&self) -> StorageResult<Vec<Report>>;

    /// One row by id, optionally also filtered by status.
    async fn get(&self, id: Uuid, status: Option<ReportStatus>) -> StorageResult<Option<Report>>;

    /// Update the given fields of the row with `id`. Matching no row is not an error.
    async fn update(&self, id: Uuid, update: &ReportUpdate) -> StorageResult<()>;

    async fn delete(&self, id: Uuid) -> StorageResult<()>;
}

/// Reachability check used by the diagnostics endpoint.
#[async_trait]
pub trait ServiceProbe: Send + Sync {
    /// Base URL of the probed service, if it has one.
    fn service_url(&self) -> Option<&str>;

    /// Issue one request and return the HTTP status it produced.
    async fn probe(&self) -> StorageResult<u16>;
}
