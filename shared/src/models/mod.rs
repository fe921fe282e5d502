//! Data models
//!
//! Persisted by the academy core and carried in backups.
//! All persisted structs use camelCase keys on the wire.

pub mod app_settings;
pub mod backup;
pub mod belt;
pub mod graduation;
pub mod payment;
pub mod student;

// Re-exports
pub use app_settings::*;
pub use backup::*;
pub use belt::*;
pub use graduation::*;
pub use payment::*;
pub use student::*;
