//! Reportbin API Library
//!
//! HTTP handlers, the upload gate, the report lifecycle service and application setup.

mod api_doc;
mod handlers;
pub mod services;
pub mod setup;
pub mod telemetry;
pub mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use api_doc::{get_openapi_spec, ApiDoc};
pub use error::{ErrorResponse, HttpAppError};
