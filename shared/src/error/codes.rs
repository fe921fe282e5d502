//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Student errors
//! - 2xxx: Graduation errors
//! - 5xxx: Payment errors
//! - 6xxx: Backup errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values for compact serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Student ====================
    /// Student not found
    StudentNotFound = 1001,
    /// Age is not a positive integer
    StudentInvalidAge = 1002,

    // ==================== 2xxx: Graduation ====================
    /// Belt is not in the catalog for the category
    BeltNotFound = 2001,
    /// Stripe count exceeds what the belt can carry
    StripeOutOfRange = 2002,

    // ==================== 5xxx: Payment ====================
    /// Payment amount is negative
    PaymentInvalidAmount = 5001,

    // ==================== 6xxx: Backup ====================
    /// Backup text is empty
    BackupEmpty = 6001,
    /// Backup text is not valid JSON
    BackupMalformed = 6002,
    /// Backup is missing a required section
    BackupInvalidStructure = 6003,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Storage read/write failed
    StorageError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Student
            ErrorCode::StudentNotFound => "Student not found",
            ErrorCode::StudentInvalidAge => "Age must be a positive integer",

            // Graduation
            ErrorCode::BeltNotFound => "Belt not found for this category",
            ErrorCode::StripeOutOfRange => "Stripe count is out of range for this belt",

            // Payment
            ErrorCode::PaymentInvalidAmount => "Payment amount must not be negative",

            // Backup
            ErrorCode::BackupEmpty => "Backup text is empty",
            ErrorCode::BackupMalformed => "Backup text is not valid JSON",
            ErrorCode::BackupInvalidStructure => "Backup is invalid or corrupted",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::StorageError => "Storage operation failed",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Student
            1001 => Ok(ErrorCode::StudentNotFound),
            1002 => Ok(ErrorCode::StudentInvalidAge),

            // Graduation
            2001 => Ok(ErrorCode::BeltNotFound),
            2002 => Ok(ErrorCode::StripeOutOfRange),

            // Payment
            5001 => Ok(ErrorCode::PaymentInvalidAmount),

            // Backup
            6001 => Ok(ErrorCode::BackupEmpty),
            6002 => Ok(ErrorCode::BackupMalformed),
            6003 => Ok(ErrorCode::BackupInvalidStructure),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            9003 => Ok(ErrorCode::NetworkError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::StudentNotFound.code(), 1001);
        assert_eq!(ErrorCode::BeltNotFound.code(), 2001);
        assert_eq!(ErrorCode::PaymentInvalidAmount.code(), 5001);
        assert_eq!(ErrorCode::BackupInvalidStructure.code(), 6003);
        assert_eq!(ErrorCode::StorageError.code(), 9002);
    }

    #[test]
    fn test_try_from_round_trip() {
        for code in [
            ErrorCode::Unknown,
            ErrorCode::StudentInvalidAge,
            ErrorCode::StripeOutOfRange,
            ErrorCode::BackupMalformed,
            ErrorCode::ConfigError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::BeltNotFound).unwrap();
        assert_eq!(json, "2001");
        let parsed: ErrorCode = serde_json::from_str("1001").unwrap();
        assert_eq!(parsed, ErrorCode::StudentNotFound);
    }
}
