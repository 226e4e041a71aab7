pub mod report_lifecycle;

pub use report_lifecycle::{LifecycleStep, Operation, OperationFailure, ReportLifecycle};
