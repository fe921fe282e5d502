//! Graduation Policy Store

use shared::models::{GraduationPolicy, GraduationSettings};

use crate::graduation::catalog;

/// Attendance thresholds keyed by `"{belt}-{category}"`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraduationPolicyStore {
    settings: GraduationSettings,
}

impl GraduationPolicyStore {
    pub fn new(settings: GraduationSettings) -> Self {
        Self { settings }
    }

    /// Policy for a belt key; belts without an entry use the default
    /// thresholds
    pub fn get(&self, belt_key: &str) -> GraduationPolicy {
        self.settings.get(belt_key).copied().unwrap_or_default()
    }

    pub fn set(&mut self, belt_key: impl Into<String>, policy: GraduationPolicy) {
        let belt_key = belt_key.into();
        tracing::debug!(
            belt = %belt_key,
            classes_per_stripe = policy.classes_per_stripe,
            classes_per_belt_cycle = policy.classes_per_belt_cycle,
            "Graduation policy updated"
        );
        self.settings.insert(belt_key, policy);
    }

    pub fn replace_all(&mut self, settings: GraduationSettings) {
        self.settings = settings;
    }

    pub fn snapshot(&self) -> GraduationSettings {
        self.settings.clone()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

/// Default policy for every belt in the catalog
pub fn generate_default() -> GraduationSettings {
    catalog::all_belts()
        .iter()
        .map(|belt| (belt.key(), GraduationPolicy::default()))
        .collect()
}
