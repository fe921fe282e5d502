//! Graduation and app settings repair

use rust_decimal::Decimal;
use serde_json::Value;
use shared::models::{
    AppSettings, BeltCategory, GraduationPolicy, GraduationSettings, Plan, Theme,
};

use super::field::{self, Field, Object};
use crate::db::repository::graduation_policy::generate_default;
use crate::graduation::catalog;

/// Repair stored graduation settings.
///
/// Non-objects and the legacy format (keys without the `-category` suffix)
/// are replaced by a full default table; malformed entries are dropped and
/// fall back to the default policy at lookup time. Keys written with the
/// legacy rank names are moved to the catalog key; keys naming no catalog
/// belt are dropped.
pub fn reconcile_graduation_settings(raw: &Value) -> GraduationSettings {
    let Value::Object(map) = raw else {
        if !raw.is_null() {
            tracing::warn!("Graduation settings are not an object, regenerating defaults");
        }
        return generate_default();
    };

    if map.keys().any(|k| !k.contains('-')) {
        tracing::info!("Legacy graduation settings format detected, regenerating defaults");
        return generate_default();
    }

    let mut settings = GraduationSettings::new();
    for (key, value) in map {
        let Value::Object(entry) = value else {
            continue;
        };
        let (Some(canonical), Some(policy)) = (catalog_key(key), reconcile_policy(entry)) else {
            continue;
        };
        // A current key wins over its legacy spelling
        if canonical == *key {
            settings.insert(canonical, policy);
        } else {
            settings.entry(canonical).or_insert(policy);
        }
    }
    settings
}

/// Catalog key for a stored `{name}-{category}` key
fn catalog_key(key: &str) -> Option<String> {
    let (name, category) = key.rsplit_once('-')?;
    let category = BeltCategory::parse(category)?;
    catalog::find_stored_belt(name, category).map(|belt| belt.key())
}

fn reconcile_policy(obj: &Object) -> Option<GraduationPolicy> {
    Some(GraduationPolicy {
        classes_per_stripe: field::count(obj, &["classesPerStripe", "classesForStripe"]).ok()?,
        classes_per_belt_cycle: field::count(obj, &["classesPerBeltCycle", "classesForBelt"])
            .ok()?,
    })
}

/// Repair stored app settings, merging whatever is usable over defaults.
///
/// The plan list is all-or-nothing: a non-array, or any plan without an id,
/// restores the default plans.
pub fn reconcile_app_settings(raw: &Value) -> AppSettings {
    let defaults = AppSettings::default();
    let Value::Object(obj) = raw else {
        return defaults;
    };

    let theme = match field::string(obj, &["theme"]) {
        Field::Valid(t) if t == "light" => Theme::Light,
        Field::Valid(t) if t == "dark" => Theme::Dark,
        _ => defaults.theme,
    };

    let plans = field::array(obj, &["plans"])
        .ok()
        .and_then(|items| reconcile_plans(items))
        .unwrap_or(defaults.plans);

    AppSettings {
        theme,
        plans,
        pix_key: field::string(obj, &["pixKey"]).or(defaults.pix_key),
    }
}

fn reconcile_plans(items: &[Value]) -> Option<Vec<Plan>> {
    items
        .iter()
        .map(|item| {
            let Value::Object(plan) = item else {
                return None;
            };
            Some(Plan {
                id: field::identifier(plan, &["id"]).ok()?,
                name: field::string(plan, &["name"]).or_default(),
                price: field::amount(plan, &["price"]).or(Decimal::ZERO),
            })
        })
        .collect()
}
