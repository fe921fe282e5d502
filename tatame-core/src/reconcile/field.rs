//! Loosely-typed field access
//!
//! Every read of persisted JSON goes through [`Field`], so a caller has to
//! say what happens when the value is missing or has the wrong shape.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::utils::validation::{AMOUNT_DECIMAL_PLACES, MAX_AMOUNT, is_storable_date};

pub type Object = Map<String, Value>;

/// Outcome of reading one field
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Valid(T),
    /// Absent or `null`
    Missing,
    /// Present with an unusable shape
    WrongType,
}

impl<T> Field<T> {
    pub fn or(self, default: T) -> T {
        match self {
            Field::Valid(v) => v,
            Field::Missing | Field::WrongType => default,
        }
    }

    pub fn or_else(self, default: impl FnOnce() -> T) -> T {
        match self {
            Field::Valid(v) => v,
            Field::Missing | Field::WrongType => default(),
        }
    }

    pub fn or_default(self) -> T
    where
        T: Default,
    {
        self.or_else(T::default)
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Field::Valid(v) => Some(v),
            Field::Missing | Field::WrongType => None,
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Field<U>) -> Field<U> {
        match self {
            Field::Valid(v) => f(v),
            Field::Missing => Field::Missing,
            Field::WrongType => Field::WrongType,
        }
    }
}

/// First present, non-null value among `keys` (current name, then legacy
/// aliases)
pub fn lookup<'a>(obj: &'a Object, keys: &[&str]) -> Field<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
        .map_or(Field::Missing, Field::Valid)
}

pub fn string(obj: &Object, keys: &[&str]) -> Field<String> {
    lookup(obj, keys).and_then(|v| match v {
        Value::String(s) => Field::Valid(s.clone()),
        _ => Field::WrongType,
    })
}

/// Identifier: non-empty string, or an integer rendered as a string
pub fn identifier(obj: &Object, keys: &[&str]) -> Field<String> {
    lookup(obj, keys).and_then(|v| match v {
        Value::String(s) if !s.trim().is_empty() => Field::Valid(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Field::Valid(n.to_string()),
        _ => Field::WrongType,
    })
}

pub fn boolean(obj: &Object, keys: &[&str]) -> Field<bool> {
    lookup(obj, keys).and_then(|v| match v {
        Value::Bool(b) => Field::Valid(*b),
        _ => Field::WrongType,
    })
}

/// Non-negative whole count. Fractions are truncated, negatives floor at
/// zero and huge values saturate.
pub fn count(obj: &Object, keys: &[&str]) -> Field<u32> {
    lookup(obj, keys).and_then(|v| match v.as_f64() {
        Some(n) if n.is_finite() => Field::Valid(n.trunc().clamp(0.0, f64::from(u32::MAX)) as u32),
        _ => Field::WrongType,
    })
}

/// Non-negative money amount from a number or a numeric string, rounded to
/// cents. Anything above [`MAX_AMOUNT`] is unusable.
pub fn amount(obj: &Object, keys: &[&str]) -> Field<Decimal> {
    lookup(obj, keys).and_then(|v| {
        let parsed = match v {
            Value::Number(n) => Decimal::from_str(&n.to_string())
                .ok()
                .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
            Value::String(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        };
        match parsed {
            Some(d) if (!d.is_sign_negative() || d.is_zero()) && d <= MAX_AMOUNT => {
                Field::Valid(d.round_dp(AMOUNT_DECIMAL_PLACES).normalize())
            }
            _ => Field::WrongType,
        }
    })
}

/// Timestamp from RFC 3339, a plain `YYYY-MM-DD` date or Unix millis.
/// Dates outside four-digit years are unusable.
pub fn timestamp(obj: &Object, keys: &[&str]) -> Field<DateTime<Utc>> {
    lookup(obj, keys).and_then(|v| {
        let parsed = match v {
            Value::String(s) => parse_date(s),
            Value::Number(n) => n
                .as_i64()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            _ => None,
        };
        parsed
            .filter(is_storable_date)
            .map_or(Field::WrongType, Field::Valid)
    })
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn array<'a>(obj: &'a Object, keys: &[&str]) -> Field<&'a Vec<Value>> {
    lookup(obj, keys).and_then(|v| match v {
        Value::Array(items) => Field::Valid(items),
        _ => Field::WrongType,
    })
}

pub fn object<'a>(obj: &'a Object, keys: &[&str]) -> Field<&'a Object> {
    lookup(obj, keys).and_then(|v| match v {
        Value::Object(map) => Field::Valid(map),
        _ => Field::WrongType,
    })
}
