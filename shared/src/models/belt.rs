//! Belt Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Students younger than this are enrolled in the kids' belt system
pub const KID_AGE_LIMIT: u32 = 16;

/// Stripes a regular belt can carry before the next belt
pub const MAX_BELT_STRIPES: u8 = 4;

/// Degrees a black belt can carry
pub const MAX_BLACK_DEGREES: u8 = 6;

pub const BLACK_BELT_NAME: &str = "Black";
pub const RED_BELT_NAME: &str = "Red";
pub const CORAL_BELT_PREFIX: &str = "Coral";

/// Belt category (学员类别)
///
/// Fixed when the student is enrolled; a birthday crossing the age limit
/// does not move an existing student to the other category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BeltCategory {
    Kid,
    Adult,
}

impl BeltCategory {
    /// Category for a student of the given age
    pub fn for_age(age: u32) -> Self {
        if age < KID_AGE_LIMIT {
            Self::Kid
        } else {
            Self::Adult
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kid => "Kid",
            Self::Adult => "Adult",
        }
    }

    /// Parse a stored category value, including the legacy Portuguese
    /// labels
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Kid" | "Infantil" => Some(Self::Kid),
            "Adult" | "Adulto" => Some(Self::Adult),
            _ => None,
        }
    }
}

impl fmt::Display for BeltCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Belt entity (腰带)
///
/// Identity is `(name, category)`; the color token is display data only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Belt {
    pub name: String,
    #[serde(alias = "color")]
    pub color_token: String,
    #[serde(alias = "type")]
    pub category: BeltCategory,
}

impl Belt {
    /// Graduation settings key, e.g. `"Blue-Adult"`
    pub fn key(&self) -> String {
        belt_key(&self.name, self.category)
    }

    /// Same rank, ignoring the color token
    pub fn same_rank(&self, other: &Belt) -> bool {
        self.name == other.name && self.category == other.category
    }

    /// Terminal rank awarded in degrees instead of stripes
    pub fn is_black(&self) -> bool {
        self.name == BLACK_BELT_NAME
    }

    /// Coral and Red ranks are awarded out of band, never by promotion
    pub fn requires_manual_promotion(&self) -> bool {
        self.name == RED_BELT_NAME || self.name.starts_with(CORAL_BELT_PREFIX)
    }

    /// Highest stripe count this belt can carry
    pub fn max_stripes(&self) -> u8 {
        if self.is_black() || self.requires_manual_promotion() {
            MAX_BLACK_DEGREES
        } else {
            MAX_BELT_STRIPES
        }
    }
}

impl fmt::Display for Belt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.category)
    }
}

/// Composite key used by graduation settings
pub fn belt_key(name: &str, category: BeltCategory) -> String {
    format!("{}-{}", name, category)
}
