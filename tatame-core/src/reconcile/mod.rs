//! Record reconciliation
//!
//! Total repair of persisted JSON into valid models. This is the only place
//! that accepts arbitrary input: storage reads and backup imports both pass
//! through here, and nothing in this module returns an error.
//!
//! Repair rules for students:
//! - non-object records are dropped
//! - unusable belt → adult white belt, whatever the age says
//! - `stripeCount` → 0 when not a number, clamped to 0..=6
//! - `classesAttended` → 0, `isActive` → true, `startDate` → now,
//!   `payments` → empty
//! - history entries keep their order by date, borrow the student's belt
//!   when theirs is unusable, and always end at the current rank

mod field;
mod settings;
mod students;

#[cfg(test)]
mod tests;

pub use field::Field;
pub use settings::{reconcile_app_settings, reconcile_graduation_settings};
pub use students::{reconcile_students, reconcile_students_value};

use chrono::{DateTime, Utc};

/// Inputs that would otherwise make repair non-deterministic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileContext {
    /// Substituted for missing dates
    pub now: DateTime<Utc>,
}

impl ReconcileContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Context anchored at the current time
    pub fn current() -> Self {
        Self::new(shared::util::now())
    }
}
