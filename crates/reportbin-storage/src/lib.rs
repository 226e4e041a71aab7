//! Reportbin Storage Library
//!
//! This crate is the report store adapter: every remote call the HTTP layer needs
//! (object put / signed read URL / delete, and CRUD on the `reports` table) goes
//! through the traits defined here.
//!
//! # Object key format
//!
//! A report's bytes live under `{id}.html`. The key is derived from the id and
//! never changes, so a replace overwrites the object in place. Key generation is
//! centralized in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "backend-memory")]
pub mod memory;
#[cfg(feature = "backend-supabase")]
pub mod supabase;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_backend, Backend};
pub use keys::{public_report_url, report_file_path};
#[cfg(feature = "backend-memory")]
pub use memory::{MemoryBackend, MemoryOp};
pub use reportbin_core::StorageBackend;
#[cfg(feature = "backend-supabase")]
pub use supabase::SupabaseBackend;
pub use traits::{ObjectStorage, ReportRepository, ServiceProbe, StorageError, StorageResult};
