//! Graduation Policy Model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_CLASSES_PER_STRIPE: u32 = 30;
pub const DEFAULT_CLASSES_PER_BELT_CYCLE: u32 = 150;

/// Attendance thresholds for one belt (毕业规则)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraduationPolicy {
    #[serde(alias = "classesForStripe")]
    pub classes_per_stripe: u32,
    #[serde(alias = "classesForBelt")]
    pub classes_per_belt_cycle: u32,
}

impl Default for GraduationPolicy {
    fn default() -> Self {
        Self {
            classes_per_stripe: DEFAULT_CLASSES_PER_STRIPE,
            classes_per_belt_cycle: DEFAULT_CLASSES_PER_BELT_CYCLE,
        }
    }
}

/// Belt key (`"{name}-{category}"`) → policy
pub type GraduationSettings = BTreeMap<String, GraduationPolicy>;
