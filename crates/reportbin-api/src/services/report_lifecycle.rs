//! Report lifecycle operations.
//!
//! Upload, replace and delete each touch the object store and the metadata table
//! in sequence, with no transaction spanning the two. Every step is tagged so a
//! failure reports which step broke and which ones had already taken effect.
//! Nothing is rolled back: an object written before a failed row insert stays
//! orphaned, and the failure log says so.

use crate::error::{storage_to_app_error, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::UploadedFile;
use chrono::Utc;
use reportbin_core::constants::HTML_CONTENT_TYPE;
use reportbin_core::models::{Report, ReportUpdate};
use reportbin_core::AppError;
use reportbin_storage::{
    public_report_url, report_file_path, ObjectStorage, ReportRepository, StorageResult,
};
use std::fmt;
use std::future::Future;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Replace,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Upload => "upload",
            Operation::Replace => "replace",
            Operation::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStep {
    LookupRow,
    RemoveObject,
    StoreObject,
    InsertRow,
    UpdateRow,
    DeleteRow,
}

impl LifecycleStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStep::LookupRow => "lookup_row",
            LifecycleStep::RemoveObject => "remove_object",
            LifecycleStep::StoreObject => "store_object",
            LifecycleStep::InsertRow => "insert_row",
            LifecycleStep::UpdateRow => "update_row",
            LifecycleStep::DeleteRow => "delete_row",
        }
    }

    /// Whether completing this step changed remote state.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, LifecycleStep::LookupRow)
    }
}

impl fmt::Display for LifecycleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle operation that stopped at `failed_step`.
#[derive(Debug)]
pub struct OperationFailure {
    pub operation: Operation,
    pub report_id: Uuid,
    pub failed_step: LifecycleStep,
    pub completed_steps: Vec<LifecycleStep>,
    pub error: AppError,
}

impl OperationFailure {
    /// True when earlier steps already changed remote state.
    pub fn left_partial_state(&self) -> bool {
        self.completed_steps.iter().any(LifecycleStep::is_mutation)
    }

    fn completed_list(&self) -> String {
        self.completed_steps
            .iter()
            .map(LifecycleStep::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    fn log(&self) {
        if self.left_partial_state() {
            tracing::warn!(
                operation = self.operation.as_str(),
                report_id = %self.report_id,
                failed_step = %self.failed_step,
                completed_steps = %self.completed_list(),
                error = %self.error,
                "Report operation failed after partial changes; no rollback attempted"
            );
        } else {
            tracing::debug!(
                operation = self.operation.as_str(),
                report_id = %self.report_id,
                failed_step = %self.failed_step,
                error = %self.error,
                "Report operation failed before any change"
            );
        }
    }
}

impl From<OperationFailure> for HttpAppError {
    fn from(failure: OperationFailure) -> Self {
        failure.log();
        HttpAppError(failure.error)
    }
}

/// Records completed steps of one operation.
struct StepTracker {
    operation: Operation,
    report_id: Uuid,
    completed: Vec<LifecycleStep>,
}

impl StepTracker {
    fn new(operation: Operation, report_id: Uuid) -> Self {
        StepTracker {
            operation,
            report_id,
            completed: Vec::new(),
        }
    }

    fn fail(&self, step: LifecycleStep, error: AppError) -> OperationFailure {
        OperationFailure {
            operation: self.operation,
            report_id: self.report_id,
            failed_step: step,
            completed_steps: self.completed.clone(),
            error,
        }
    }

    async fn run<T, F>(&mut self, step: LifecycleStep, fut: F) -> Result<T, OperationFailure>
    where
        F: Future<Output = StorageResult<T>>,
    {
        match fut.await {
            Ok(value) => {
                self.completed.push(step);
                Ok(value)
            }
            Err(e) => Err(self.fail(step, storage_to_app_error(e))),
        }
    }

    async fn lookup(
        &mut self,
        reports: &dyn ReportRepository,
    ) -> Result<Report, OperationFailure> {
        let id = self.report_id;
        let row = self
            .run(LifecycleStep::LookupRow, reports.get(id, None))
            .await?;
        row.ok_or_else(|| {
            self.fail(
                LifecycleStep::LookupRow,
                AppError::NotFound("Report not found".to_string()),
            )
        })
    }
}

/// Multi-step report operations over the configured backend.
pub struct ReportLifecycle<'a> {
    objects: &'a dyn ObjectStorage,
    reports: &'a dyn ReportRepository,
    app_url: &'a str,
}

impl<'a> ReportLifecycle<'a> {
    pub fn new(
        objects: &'a dyn ObjectStorage,
        reports: &'a dyn ReportRepository,
        app_url: &'a str,
    ) -> Self {
        ReportLifecycle {
            objects,
            reports,
            app_url,
        }
    }

    pub fn from_state(state: &'a AppState) -> Self {
        Self::new(
            state.objects.as_ref(),
            state.reports.as_ref(),
            state.config.app_url(),
        )
    }

    /// Store a new report under a fresh id: object first, then the row.
    pub async fn upload(&self, file: UploadedFile) -> Result<Report, OperationFailure> {
        let id = Uuid::new_v4();
        let mut steps = StepTracker::new(Operation::Upload, id);
        let file_path = report_file_path(id);

        steps
            .run(
                LifecycleStep::StoreObject,
                self.objects
                    .put_object(&file_path, file.data, HTML_CONTENT_TYPE, false),
            )
            .await?;

        let report = Report::new_active(
            id,
            file.original_filename,
            file_path,
            public_report_url(self.app_url, id),
            Utc::now(),
        );
        steps
            .run(LifecycleStep::InsertRow, self.reports.insert(&report))
            .await?;

        tracing::info!(report_id = %id, filename = %report.original_filename, "Report uploaded");
        Ok(report)
    }

    /// Overwrite the content of an existing report, keeping its id and key.
    pub async fn replace(&self, id: Uuid, file: UploadedFile) -> Result<(), OperationFailure> {
        let mut steps = StepTracker::new(Operation::Replace, id);
        let existing = steps.lookup(self.reports).await?;

        steps
            .run(
                LifecycleStep::RemoveObject,
                self.objects.delete_object(&existing.file_path),
            )
            .await?;

        steps
            .run(
                LifecycleStep::StoreObject,
                self.objects.put_object(
                    &report_file_path(id),
                    file.data,
                    HTML_CONTENT_TYPE,
                    true,
                ),
            )
            .await?;

        let update = ReportUpdate::replaced(file.original_filename, Utc::now());
        steps
            .run(LifecycleStep::UpdateRow, self.reports.update(id, &update))
            .await?;

        tracing::info!(report_id = %id, "Report replaced");
        Ok(())
    }

    /// Remove a report's object, then its row.
    pub async fn delete(&self, id: Uuid) -> Result<(), OperationFailure> {
        let mut steps = StepTracker::new(Operation::Delete, id);
        let existing = steps.lookup(self.reports).await?;

        steps
            .run(
                LifecycleStep::RemoveObject,
                self.objects.delete_object(&existing.file_path),
            )
            .await?;
        steps
            .run(LifecycleStep::DeleteRow, self.reports.delete(id))
            .await?;

        tracing::info!(report_id = %id, "Report deleted");
        Ok(())
    }
}
