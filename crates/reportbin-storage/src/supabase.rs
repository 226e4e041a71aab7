//! Supabase-compatible backend.
//!
//! Objects go through the storage REST API (`/storage/v1`), rows through
//! PostgREST (`/rest/v1/{table}`). Both authenticate with the same project key,
//! sent as `apikey` and as a bearer token.

use crate::keys::encode_key;
use crate::traits::{
    ObjectStorage, ReportRepository, ServiceProbe, StorageError, StorageResult,
};
use async_trait::async_trait;
use bytes::Bytes;
use reportbin_core::models::{Report, ReportStatus, ReportUpdate};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Error body shapes returned by the storage API and PostgREST.
#[derive(Debug, Default, Deserialize)]
struct ServiceErrorBody {
    /// Sent as a string by the storage API and as a number by some gateways.
    #[serde(default, rename = "statusCode")]
    status_code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SignedUrlBody {
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: String,
}

/// Client for one project, bucket and metadata table.
#[derive(Clone, Debug)]
pub struct SupabaseBackend {
    client: Client,
    base_url: String,
    api_key: String,
    bucket: String,
    table: String,
}

impl SupabaseBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        bucket: impl Into<String>,
        table: impl Into<String>,
    ) -> StorageResult<Self> {
        let client = Client::builder().build().map_err(|e| {
            StorageError::ConfigError(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(SupabaseBackend {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            bucket: bucket.into(),
            table: table.into(),
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            encode_key(key)
        )
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", self.api_key.as_str())
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, request: RequestBuilder) -> StorageResult<Response> {
        self.authorized(request)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))
    }
}

/// Read the error message out of a failed response, falling back to the status line.
async fn error_message(response: Response) -> (StatusCode, Option<String>, String) {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body: ServiceErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let message = body
        .message
        .or(body.msg)
        .or(body.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if text.trim().is_empty() {
                format!("Storage service returned {}", status)
            } else {
                text.clone()
            }
        });
    let status_code = body.status_code.as_ref().and_then(status_code_text);
    (status, status_code, message)
}

fn status_code_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(code) => Some(code.clone()),
        serde_json::Value::Number(code) => Some(code.to_string()),
        _ => None,
    }
}

#[async_trait]
impl ObjectStorage for SupabaseBackend {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        overwrite: bool,
    ) -> StorageResult<()> {
        let size = data.len();
        let start = Instant::now();

        let response = self
            .send(
                self.client
                    .post(self.object_url(key))
                    .header(reqwest::header::CONTENT_TYPE, content_type)
                    .header(reqwest::header::CACHE_CONTROL, "max-age=3600")
                    .header("x-upsert", if overwrite { "true" } else { "false" })
                    .body(data),
            )
            .await?;

        if !response.status().is_success() {
            let (status, status_code, message) = error_message(response).await;
            // The storage API reports duplicates either as 409 or as 400 with statusCode "409".
            if status == StatusCode::CONFLICT || status_code.as_deref() == Some("409") {
                return Err(StorageError::Conflict(message));
            }
            return Err(StorageError::UploadFailed(message));
        }

        tracing::info!(
            key = %key,
            size_bytes = size,
            overwrite,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object upload successful"
        );
        Ok(())
    }

    async fn signed_read_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let url = format!(
            "{}/storage/v1/object/sign/{}/{}",
            self.base_url,
            self.bucket,
            encode_key(key)
        );
        let response = self
            .send(
                self.client
                    .post(url)
                    .json(&serde_json::json!({ "expiresIn": expires_in.as_secs() })),
            )
            .await?;

        if !response.status().is_success() {
            let (_, _, message) = error_message(response).await;
            return Err(StorageError::SignFailed(message));
        }

        let body: SignedUrlBody = response
            .json()
            .await
            .map_err(|e| StorageError::SignFailed(format!("Invalid signed URL response: {}", e)))?;

        if body.signed_url.starts_with("http://") || body.signed_url.starts_with("https://") {
            Ok(body.signed_url)
        } else {
            Ok(format!("{}/storage/v1{}", self.base_url, body.signed_url))
        }
    }

    async fn fetch_signed(&self, signed_url: &str) -> StorageResult<Bytes> {
        // The signature in the URL is the credential; no project key is attached.
        let response = self
            .client
            .get(signed_url)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::DownloadFailed(format!(
                "Signed URL fetch returned {}",
                status
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        let url = format!("{}/storage/v1/object/{}", self.base_url, self.bucket);
        let response = self
            .send(
                self.client
                    .delete(url)
                    .json(&serde_json::json!({ "prefixes": [key] })),
            )
            .await?;

        if !response.status().is_success() {
            let (_, _, message) = error_message(response).await;
            return Err(StorageError::DeleteFailed(message));
        }

        tracing::info!(key = %key, "Object delete successful");
        Ok(())
    }
}

impl SupabaseBackend {
    async fn check_rows(response: Response) -> StorageResult<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let (_, _, message) = error_message(response).await;
            Err(StorageError::Database(message))
        }
    }
}

#[async_trait]
impl ReportRepository for SupabaseBackend {
    async fn insert(&self, report: &Report) -> StorageResult<()> {
        let response = self
            .send(
                self.client
                    .post(self.table_url())
                    .header("Prefer", "return=minimal")
                    .json(&[report]),
            )
            .await?;
        Self::check_rows(response).await?;
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<Report>> {
        let response = self
            .send(
                self.client
                    .get(self.table_url())
                    .query(&[("select", "*"), ("order", "created_at.desc")]),
            )
            .await?;
        let response = Self::check_rows(response).await?;

        let reports: Vec<Report> = response
            .json()
            .await
            .map_err(|e| StorageError::Database(format!("Invalid rows in response: {}", e)))?;
        tracing::debug!(count = reports.len(), "Reports fetched");
        Ok(reports)
    }

    async fn get(&self, id: Uuid, status: Option<ReportStatus>) -> StorageResult<Option<Report>> {
        let mut query = vec![
            ("select", "*".to_string()),
            ("id", format!("eq.{}", id)),
        ];
        if let Some(status) = status {
            query.push(("status", format!("eq.{}", status)));
        }
        query.push(("limit", "1".to_string()));

        let response = self
            .send(self.client.get(self.table_url()).query(&query))
            .await?;
        let response = Self::check_rows(response).await?;

        let mut rows: Vec<Report> = response
            .json()
            .await
            .map_err(|e| StorageError::Database(format!("Invalid rows in response: {}", e)))?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    async fn update(&self, id: Uuid, update: &ReportUpdate) -> StorageResult<()> {
        let response = self
            .send(
                self.client
                    .patch(self.table_url())
                    .query(&[("id", format!("eq.{}", id))])
                    .header("Prefer", "return=minimal")
                    .json(update),
            )
            .await?;
        Self::check_rows(response).await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let response = self
            .send(
                self.client
                    .delete(self.table_url())
                    .query(&[("id", format!("eq.{}", id))]),
            )
            .await?;
        Self::check_rows(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ServiceProbe for SupabaseBackend {
    fn service_url(&self) -> Option<&str> {
        Some(&self.base_url)
    }

    async fn probe(&self) -> StorageResult<u16> {
        tracing::info!(service_url = %self.base_url, "Testing connection to storage service");
        let response = self
            .client
            .get(format!("{}/rest/v1/", self.base_url))
            .header("apikey", self.api_key.as_str())
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}
