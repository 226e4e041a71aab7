//! Reportbin Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! the storage adapter and the HTTP API.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ReportServiceConfig, StorageBackend};
pub use error::{AppError, ErrorKind, ErrorMetadata, LogLevel};
