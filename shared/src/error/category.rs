//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// - 0xxx: General errors
/// - 1xxx: Student errors
/// - 2xxx: Graduation errors
/// - 5xxx: Payment errors
/// - 6xxx: Backup errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Student errors (1xxx)
    Student,
    /// Graduation errors (2xxx)
    Graduation,
    /// Payment errors (5xxx)
    Payment,
    /// Backup errors (6xxx)
    Backup,
    /// System errors (9xxx and anything unassigned)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Student,
            2000..3000 => Self::Graduation,
            5000..6000 => Self::Payment,
            6000..7000 => Self::Backup,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Student => "student",
            Self::Graduation => "graduation",
            Self::Payment => "payment",
            Self::Backup => "backup",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
