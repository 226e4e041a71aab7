use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Public visibility of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Active,
    Disabled,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Active => "active",
            ReportStatus::Disabled => "disabled",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One uploaded HTML document, as stored in the `reports` table.
///
/// `file_path` is always `{id}.html` and never changes across a replace;
/// `public_url` is a display copy of `{APP_URL}/reports/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Report {
    pub id: Uuid,
    pub original_filename: String,
    pub file_path: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub public_url: String,
}

impl Report {
    /// A freshly uploaded report: active, never updated.
    pub fn new_active(
        id: Uuid,
        original_filename: impl Into<String>,
        file_path: impl Into<String>,
        public_url: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Report {
            id,
            original_filename: original_filename.into(),
            file_path: file_path.into(),
            status: ReportStatus::Active,
            created_at,
            updated_at: None,
            public_url: public_url.into(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ReportStatus::Active
    }

    /// Apply a partial update in place (used by backends that hold rows in memory).
    pub fn apply(&mut self, update: &ReportUpdate) {
        if let Some(name) = &update.original_filename {
            self.original_filename = name.clone();
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(updated_at) = update.updated_at {
            self.updated_at = Some(updated_at);
        }
    }
}

/// Fields that may change on an existing row. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReportStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ReportUpdate {
    pub fn disable() -> Self {
        ReportUpdate {
            status: Some(ReportStatus::Disabled),
            ..Default::default()
        }
    }

    /// Row change after the stored object was overwritten with a new upload.
    pub fn replaced(original_filename: impl Into<String>, at: DateTime<Utc>) -> Self {
        ReportUpdate {
            original_filename: Some(original_filename.into()),
            status: Some(ReportStatus::Active),
            updated_at: Some(at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub report_id: Uuid,
    pub public_url: String,
    pub filename: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        SuccessResponse { success: true }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsResponse {
    pub status: String,
    pub service_url: Option<String>,
    pub response_status: u16,
    pub message: String,
}
