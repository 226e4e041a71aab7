pub mod report;

pub use report::{
    DiagnosticsResponse, HealthResponse, Report, ReportStatus, ReportUpdate, SuccessResponse,
    UploadResponse,
};
