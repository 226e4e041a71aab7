pub mod health;
pub mod manage;
pub mod public_report;
pub mod reports;
pub mod upload;

use reportbin_core::AppError;
use uuid::Uuid;

/// Path ids that are not UUIDs cannot name a report.
pub(crate) fn parse_report_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Report not found".to_string()))
}
