//! Reports - read-only aggregates over a roster snapshot

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{BeltCategory, PaymentStatus, Student};
use std::collections::BTreeMap;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: usize,
    /// Students with at least one pending or overdue payment
    pub students_with_open_payments: usize,
    /// Sum of each student's most recent paid payment
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_monthly_revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    pub year: i32,
    /// 1-12
    pub month: u32,
    /// e.g. `"Mar/24"`
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

pub fn dashboard_stats(students: &[Student]) -> DashboardStats {
    let students_with_open_payments = students
        .iter()
        .filter(|s| s.payments.iter().any(|p| p.status.is_open()))
        .count();

    // Payments are newest first
    let estimated_monthly_revenue = students
        .iter()
        .filter_map(|s| s.payments.iter().find(|p| p.status == PaymentStatus::Paid))
        .map(|p| p.amount)
        .sum();

    DashboardStats {
        total_students: students.len(),
        students_with_open_payments,
        estimated_monthly_revenue,
    }
}

/// Paid revenue grouped by calendar month, oldest first
pub fn revenue_by_month(students: &[Student]) -> Vec<MonthlyRevenue> {
    let mut months: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for payment in students
        .iter()
        .flat_map(|s| &s.payments)
        .filter(|p| p.status == PaymentStatus::Paid)
    {
        *months
            .entry((payment.date.year(), payment.date.month()))
            .or_default() += payment.amount;
    }

    months
        .into_iter()
        .map(|((year, month), total)| MonthlyRevenue {
            year,
            month,
            label: month_label(year, month),
            total,
        })
        .collect()
}

fn month_label(year: i32, month: u32) -> String {
    let name = MONTH_LABELS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?");
    format!("{name}/{:02}", year.rem_euclid(100))
}

/// Sum of all paid payments
pub fn total_revenue(students: &[Student]) -> Decimal {
    students
        .iter()
        .flat_map(|s| &s.payments)
        .filter(|p| p.status == PaymentStatus::Paid)
        .map(|p| p.amount)
        .sum()
}

/// Students whose latest payment is missing or not yet paid
pub fn students_with_pending_payments(students: &[Student]) -> Vec<Student> {
    students
        .iter()
        .filter(|s| {
            s.latest_payment()
                .is_none_or(|p| p.status != PaymentStatus::Paid)
        })
        .cloned()
        .collect()
}

/// Adult black belts, longest-training first
pub fn black_belt_roll(students: &[Student]) -> Vec<Student> {
    let mut roll: Vec<Student> = students
        .iter()
        .filter(|s| s.belt.is_black() && s.belt.category == BeltCategory::Adult)
        .cloned()
        .collect();
    roll.sort_by_key(|s| s.start_date);
    roll
}
