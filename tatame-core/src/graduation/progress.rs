//! Attendance progress toward the next stripe and belt

use serde::{Deserialize, Serialize};
use shared::models::{GraduationPolicy, Student};

/// Progress derived from the attendance counter and the belt's policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceProgress {
    /// Classes counted in the current belt cycle
    pub classes_in_cycle: u32,
    /// Classes counted toward the next stripe
    pub classes_toward_stripe: u32,
    pub classes_per_stripe: u32,
    pub classes_per_belt_cycle: u32,
    /// 0..=100
    pub stripe_percent: f64,
    /// 0..=100
    pub belt_percent: f64,
}

/// Compute progress for a student under a policy.
///
/// A zero threshold disables that counter: its remainder and percentage are
/// reported as zero.
pub fn attendance_progress(student: &Student, policy: &GraduationPolicy) -> AttendanceProgress {
    let classes_in_cycle = remainder(student.classes_attended, policy.classes_per_belt_cycle);
    let classes_toward_stripe = remainder(classes_in_cycle, policy.classes_per_stripe);

    AttendanceProgress {
        classes_in_cycle,
        classes_toward_stripe,
        classes_per_stripe: policy.classes_per_stripe,
        classes_per_belt_cycle: policy.classes_per_belt_cycle,
        stripe_percent: percent(classes_toward_stripe, policy.classes_per_stripe),
        belt_percent: percent(classes_in_cycle, policy.classes_per_belt_cycle),
    }
}

fn remainder(value: u32, divisor: u32) -> u32 {
    if divisor == 0 { 0 } else { value % divisor }
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (f64::from(part) / f64::from(whole) * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graduation::catalog;
    use chrono::Utc;
    use shared::models::BeltCategory;

    fn student_with_classes(classes: u32) -> Student {
        let belt = catalog::starting_belt(BeltCategory::Adult);
        Student {
            id: "s1".into(),
            name: "Test".into(),
            age: 30,
            belt: belt.clone(),
            stripe_count: 0,
            classes_attended: classes,
            start_date: Utc::now(),
            phone: String::new(),
            address: String::new(),
            payments: vec![],
            is_active: true,
            promotion_history: vec![],
        }
    }

    #[test]
    fn test_progress_with_default_policy() {
        let progress = attendance_progress(&student_with_classes(180), &GraduationPolicy::default());
        // 180 % 150 = 30, 30 % 30 = 0
        assert_eq!(progress.classes_in_cycle, 30);
        assert_eq!(progress.classes_toward_stripe, 0);
        assert_eq!(progress.stripe_percent, 0.0);
        assert_eq!(progress.belt_percent, 20.0);
    }

    #[test]
    fn test_partial_stripe() {
        let progress = attendance_progress(&student_with_classes(110), &GraduationPolicy::default());
        assert_eq!(progress.classes_in_cycle, 110);
        assert_eq!(progress.classes_toward_stripe, 20);
        assert!((progress.stripe_percent - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_zero_thresholds_do_not_divide() {
        let policy = GraduationPolicy {
            classes_per_stripe: 0,
            classes_per_belt_cycle: 0,
        };
        let progress = attendance_progress(&student_with_classes(42), &policy);
        assert_eq!(progress.classes_in_cycle, 0);
        assert_eq!(progress.stripe_percent, 0.0);
        assert_eq!(progress.belt_percent, 0.0);
    }
}
