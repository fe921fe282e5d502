//! Student Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::belt::{Belt, BeltCategory};
use super::payment::Payment;

/// Promotion snapshot (晋级记录)
///
/// Appended whenever a student's belt or stripe count changes; never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub date: DateTime<Utc>,
    pub belt: Belt,
    #[serde(alias = "stripes")]
    pub stripe_count: u8,
}

/// Student entity (学员)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub belt: Belt,
    #[serde(alias = "stripes")]
    pub stripe_count: u8,
    pub classes_attended: u32,
    pub start_date: DateTime<Utc>,
    pub phone: String,
    pub address: String,
    /// Newest first
    pub payments: Vec<Payment>,
    pub is_active: bool,
    pub promotion_history: Vec<Promotion>,
}

impl Student {
    /// Category fixed at enrollment
    pub fn category(&self) -> BeltCategory {
        self.belt.category
    }

    /// Most recent payment, if any
    pub fn latest_payment(&self) -> Option<&Payment> {
        self.payments.first()
    }

    /// History is non-empty, chronological and ends at the current rank
    pub fn history_is_consistent(&self) -> bool {
        let Some(last) = self.promotion_history.last() else {
            return false;
        };
        let ordered = self
            .promotion_history
            .windows(2)
            .all(|pair| pair[0].date <= pair[1].date);
        ordered && last.belt.same_rank(&self.belt) && last.stripe_count == self.stripe_count
    }
}

/// Enroll student payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCreate {
    pub name: String,
    /// Signed so that a negative form value is reported, not wrapped
    pub age: i64,
    /// Belt name within the age-derived category; White when omitted
    pub belt_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

/// Update student payload
///
/// `belt_name`/`stripe_count` are a manual rank assignment (e.g. awarding a
/// coral belt) and are recorded in the promotion history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub belt_name: Option<String>,
    pub stripe_count: Option<u8>,
}
