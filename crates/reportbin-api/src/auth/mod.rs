//! Credential gate for operator routes.

pub mod middleware;

pub use middleware::{require_upload_password, UploadGate};
