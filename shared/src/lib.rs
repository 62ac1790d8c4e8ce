//! Shared types for the showroom catalog
//!
//! Record models, filter criteria, numeric extraction and the structured
//! error system used by the client crate.

pub mod catalog;
pub mod error;
pub mod models;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use catalog::{CatalogRecord, RecordDraft};
pub use error::{AppError, AppResult, ErrorCode};
