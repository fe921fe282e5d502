//! Belt Catalog
//!
//! Static, ordered table of every rank. Within a category the order is the
//! promotion sequence; Coral and Red ranks close the adult table and are
//! never reached by automatic promotion.

use shared::models::{Belt, BeltCategory};

struct BeltEntry {
    name: &'static str,
    /// Name written by older releases, which stored Portuguese ranks
    legacy_name: &'static str,
    color: &'static str,
    category: BeltCategory,
}

const fn entry(
    name: &'static str,
    legacy_name: &'static str,
    color: &'static str,
    category: BeltCategory,
) -> BeltEntry {
    BeltEntry {
        name,
        legacy_name,
        color,
        category,
    }
}

use BeltCategory::{Adult, Kid};

static BELTS: &[BeltEntry] = &[
    // Kids
    entry("White", "Branca", "#FFFFFF", Kid),
    entry("Grey and White", "Cinza e Branca", "#808080", Kid),
    entry("Grey", "Cinza", "#808080", Kid),
    entry("Grey and Black", "Cinza e Preta", "#808080", Kid),
    entry("Yellow and White", "Amarela e Branca", "#FFFF00", Kid),
    entry("Yellow", "Amarela", "#FFFF00", Kid),
    entry("Yellow and Black", "Amarela e Preta", "#FFFF00", Kid),
    entry("Orange and White", "Laranja e Branca", "#FFA500", Kid),
    entry("Orange", "Laranja", "#FFA500", Kid),
    entry("Orange and Black", "Laranja e Preta", "#FFA500", Kid),
    entry("Green and White", "Verde e Branca", "#008000", Kid),
    entry("Green", "Verde", "#008000", Kid),
    entry("Green and Black", "Verde e Preta", "#008000", Kid),
    // Adults
    entry("White", "Branca", "#FFFFFF", Adult),
    entry("Blue", "Azul", "#0000FF", Adult),
    entry("Purple", "Roxa", "#800080", Adult),
    entry("Brown", "Marrom", "#A52A2A", Adult),
    entry("Black", "Preta", "#000000", Adult),
    entry("Coral (Red and Black)", "Coral (Vermelha e Preta)", "#FF0000", Adult),
    entry("Coral (Red and White)", "Coral (Vermelha e Branca)", "#FF0000", Adult),
    entry("Red", "Vermelha", "#FF0000", Adult),
];

/// Name of the first rank of every category
pub const STARTING_BELT_NAME: &str = "White";

impl BeltEntry {
    fn to_belt(&self) -> Belt {
        Belt {
            name: self.name.to_string(),
            color_token: self.color.to_string(),
            category: self.category,
        }
    }

    fn matches(&self, name: &str, category: BeltCategory) -> bool {
        self.name == name && self.category == category
    }
}

/// Every belt in catalog order (kids first)
pub fn all_belts() -> Vec<Belt> {
    BELTS.iter().map(BeltEntry::to_belt).collect()
}

/// Belts of one category in promotion order
pub fn list_belts(category: BeltCategory) -> Vec<Belt> {
    BELTS
        .iter()
        .filter(|e| e.category == category)
        .map(BeltEntry::to_belt)
        .collect()
}

pub fn find_belt(name: &str, category: BeltCategory) -> Option<Belt> {
    BELTS
        .iter()
        .find(|e| e.matches(name, category))
        .map(BeltEntry::to_belt)
}

/// Like [`find_belt`], but also accepts the legacy rank names found in
/// stored data
pub fn find_stored_belt(name: &str, category: BeltCategory) -> Option<Belt> {
    BELTS
        .iter()
        .find(|e| e.category == category && (e.name == name || e.legacy_name == name))
        .map(BeltEntry::to_belt)
}

/// Position in the full cross-category table
pub fn index_of(belt: &Belt) -> Option<usize> {
    BELTS
        .iter()
        .position(|e| e.matches(&belt.name, belt.category))
}

/// Next rank of the same category, if any
pub fn next_belt(belt: &Belt) -> Option<Belt> {
    let index = index_of(belt)?;
    BELTS
        .get(index + 1)
        .filter(|e| e.category == belt.category)
        .map(BeltEntry::to_belt)
}

/// Default substituted by reconciliation for unusable belt data.
///
/// Always the adult white belt, whatever the record's age says; older data
/// was repaired this way and existing rosters depend on it.
pub fn default_belt() -> Belt {
    starting_belt(BeltCategory::Adult)
}

/// First rank of a category
pub fn starting_belt(category: BeltCategory) -> Belt {
    Belt {
        name: STARTING_BELT_NAME.to_string(),
        color_token: "#FFFFFF".to_string(),
        category,
    }
}
