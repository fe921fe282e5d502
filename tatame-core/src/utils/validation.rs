//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by the
//! repositories before any mutation happens.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Student names, plan names
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: phone, payment key
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Oldest accepted age
pub const MAX_AGE: i64 = 130;

/// Money is kept in cents
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Largest accepted amount; keeps every cent exact as a JSON float
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Dates must fit the four-digit years of RFC 3339
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(
            AppError::with_message(ErrorCode::RequiredField, format!("{field} must not be empty"))
                .with_detail("field", field),
        );
    }
    validate_length(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: Option<&str>, field: &str, max_len: usize) -> AppResult<()> {
    match value {
        Some(v) => validate_length(v, field, max_len),
        None => Ok(()),
    }
}

fn validate_length(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate an age and narrow it to the stored type
pub fn validate_age(age: i64) -> AppResult<u32> {
    if age <= 0 || age > MAX_AGE {
        return Err(AppError::with_message(
            ErrorCode::StudentInvalidAge,
            format!("age must be between 1 and {MAX_AGE}, got {age}"),
        )
        .with_detail("field", "age"));
    }
    u32::try_from(age).map_err(|_| AppError::new(ErrorCode::StudentInvalidAge))
}

/// Validate a monetary amount: non-negative, at most [`MAX_AMOUNT`], whole
/// cents
pub fn validate_amount(amount: Decimal, field: &str) -> AppResult<()> {
    let invalid = |reason: String| -> AppResult<()> {
        Err(AppError::with_message(ErrorCode::PaymentInvalidAmount, reason).with_detail("field", field))
    };
    if amount.is_sign_negative() && !amount.is_zero() {
        return invalid(format!("{field} must not be negative, got {amount}"));
    }
    if amount > MAX_AMOUNT {
        return invalid(format!("{field} must not exceed {MAX_AMOUNT}, got {amount}"));
    }
    if amount.normalize().scale() > AMOUNT_DECIMAL_PLACES {
        return invalid(format!("{field} must be in whole cents, got {amount}"));
    }
    Ok(())
}

/// Whether the date can be written and read back as RFC 3339
pub fn is_storable_date(date: &DateTime<Utc>) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&date.year())
}

/// Validate an optional date against the storable range
pub fn validate_date(date: Option<&DateTime<Utc>>, field: &str) -> AppResult<()> {
    match date {
        Some(d) if !is_storable_date(d) => Err(AppError::validation(format!(
            "{field} must fall between years {MIN_YEAR} and {MAX_YEAR}, got {d}"
        ))
        .with_detail("field", field)),
        _ => Ok(()),
    }
}
