//! Storage collaborator
//!
//! The core hands raw JSON to storage and gets raw JSON back; whatever comes
//! back goes through reconciliation, so a local file and a remote store are
//! treated identically.

mod file;
mod memory;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use serde_json::Value;
use shared::error::AppError;
use std::fmt;
use thiserror::Error;

/// Independently persisted state sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageSection {
    Students,
    GraduationSettings,
    AppSettings,
}

impl StorageSection {
    pub const ALL: [StorageSection; 3] = [
        StorageSection::Students,
        StorageSection::GraduationSettings,
        StorageSection::AppSettings,
    ];

    /// Stable name used for file names and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::GraduationSettings => "graduation_settings",
            Self::AppSettings => "app_settings",
        }
    }
}

impl fmt::Display for StorageSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage error types
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {section}: {source}")]
    Io {
        section: StorageSection,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error on {section}: {source}")]
    Serialization {
        section: StorageSection,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::storage(err.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Load/save raw section data
#[async_trait]
pub trait Storage: Send + Sync {
    /// `Ok(None)` when the section was never saved
    async fn load(&self, section: StorageSection) -> StorageResult<Option<Value>>;

    async fn save(&self, section: StorageSection, data: &Value) -> StorageResult<()>;
}
