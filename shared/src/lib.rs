//! Shared types for the Tatame academy core
//!
//! Models persisted by the core (students, belts, payments, graduation
//! settings, app settings, backups) and the unified error system.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
