//! Promotion transition
//!
//! Pure rank arithmetic, no I/O. The repository applies the result and
//! records the history snapshot.

use serde::{Deserialize, Serialize};
use shared::models::{Belt, MAX_BELT_STRIPES, MAX_BLACK_DEGREES, Student};
use std::fmt;

use super::catalog;

/// What a successful promotion changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionKind {
    /// One more stripe on the same belt
    Stripe,
    /// Next belt, stripes reset
    Belt,
    /// One more black belt degree
    Degree,
}

/// Why a promotion was refused. Expected terminal states, not faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionRejection {
    /// Black belt already carries six degrees
    MaxDegreeReached,
    /// No automatically reachable belt above this one (category ceiling, or
    /// the next rank is Coral/Red)
    CeilingBeforeSpecialRanks,
}

impl fmt::Display for PromotionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxDegreeReached => f.write_str("maximum degree reached"),
            Self::CeilingBeforeSpecialRanks => {
                f.write_str("at ceiling before special-evaluation ranks")
            }
        }
    }
}

/// New rank after one promotion step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankStep {
    pub belt: Belt,
    pub stripe_count: u8,
    pub kind: PromotionKind,
}

/// Result of `promote` on the student repository
#[derive(Debug, Clone, PartialEq)]
pub enum PromotionOutcome {
    Promoted { student: Student, kind: PromotionKind },
    Rejected(PromotionRejection),
    /// Unknown id; nothing happened
    StudentNotFound,
}

impl PromotionOutcome {
    pub fn is_promoted(&self) -> bool {
        matches!(self, Self::Promoted { .. })
    }
}

/// Compute the rank that follows `(belt, stripe_count)`.
///
/// - Black: +1 degree up to six, then `MaxDegreeReached`.
/// - Other belts: +1 stripe below four; from four on, the next belt of the
///   same category with zero stripes, unless there is none or it is a
///   Coral/Red rank.
pub fn next_rank(belt: &Belt, stripe_count: u8) -> Result<RankStep, PromotionRejection> {
    if belt.is_black() {
        if stripe_count < MAX_BLACK_DEGREES {
            return Ok(RankStep {
                belt: belt.clone(),
                stripe_count: stripe_count + 1,
                kind: PromotionKind::Degree,
            });
        }
        return Err(PromotionRejection::MaxDegreeReached);
    }

    if stripe_count < MAX_BELT_STRIPES {
        return Ok(RankStep {
            belt: belt.clone(),
            stripe_count: stripe_count + 1,
            kind: PromotionKind::Stripe,
        });
    }

    match catalog::next_belt(belt) {
        Some(next) if !next.requires_manual_promotion() => Ok(RankStep {
            belt: next,
            stripe_count: 0,
            kind: PromotionKind::Belt,
        }),
        _ => Err(PromotionRejection::CeilingBeforeSpecialRanks),
    }
}
