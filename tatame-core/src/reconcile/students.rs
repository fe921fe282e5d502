//! Student record repair

use chrono::{DateTime, Utc};
use serde_json::Value;
use shared::models::{
    Belt, BeltCategory, MAX_BLACK_DEGREES, Payment, PaymentStatus, Promotion, Student,
};

use super::ReconcileContext;
use super::field::{self, Field, Object};
use crate::graduation::catalog;

/// Repair a raw student section (anything that is not an array yields an
/// empty roster)
pub fn reconcile_students_value(raw: &Value, ctx: &ReconcileContext) -> Vec<Student> {
    match raw {
        Value::Array(records) => reconcile_students(records, ctx),
        Value::Null => Vec::new(),
        other => {
            tracing::warn!(kind = json_kind(other), "Student data is not an array, discarding");
            Vec::new()
        }
    }
}

/// Repair raw student records. Never fails; non-objects are dropped.
pub fn reconcile_students(raw: &[Value], ctx: &ReconcileContext) -> Vec<Student> {
    let students: Vec<Student> = raw
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match value {
            Value::Object(obj) => Some(reconcile_student(index, obj, ctx)),
            other => {
                tracing::debug!(index, kind = json_kind(other), "Dropping non-object student record");
                None
            }
        })
        .collect();

    if students.len() != raw.len() {
        tracing::warn!(
            kept = students.len(),
            dropped = raw.len() - students.len(),
            "Dropped unusable student records"
        );
    }
    students
}

fn reconcile_student(index: usize, obj: &Object, ctx: &ReconcileContext) -> Student {
    let id = field::identifier(obj, &["id"]).or_else(|| format!("recovered-{index}"));
    let belt = reconcile_belt(field::lookup(obj, &["belt"]).ok()).unwrap_or_else(|| {
        tracing::debug!(id = %id, "Substituting default belt");
        catalog::default_belt()
    });
    let stripe_count = stripes(obj);
    let start_date = field::timestamp(obj, &["startDate"]).or(ctx.now);

    let payments = match field::array(obj, &["payments"]) {
        Field::Valid(items) => items
            .iter()
            .enumerate()
            .filter_map(|(i, p)| match p {
                Value::Object(p) => reconcile_payment(p, &id, i, ctx),
                _ => None,
            })
            .collect(),
        Field::Missing | Field::WrongType => Vec::new(),
    };

    let promotion_history = reconcile_history(obj, &belt, stripe_count, start_date);

    Student {
        name: field::string(obj, &["name"]).or_default(),
        age: field::count(obj, &["age"]).or(0),
        classes_attended: field::count(obj, &["classesAttended"]).or(0),
        phone: field::string(obj, &["phone"]).or_default(),
        address: field::string(obj, &["address"]).or_default(),
        is_active: field::boolean(obj, &["isActive"]).or(true),
        id,
        belt,
        stripe_count,
        start_date,
        payments,
        promotion_history,
    }
}

/// Catalog belt referenced by a raw belt object, if it names one
pub(super) fn reconcile_belt(raw: Option<&Value>) -> Option<Belt> {
    let Some(Value::Object(obj)) = raw else {
        return None;
    };
    let name = field::string(obj, &["name"]).ok()?;
    let category = field::string(obj, &["category", "type"])
        .ok()
        .and_then(|c| BeltCategory::parse(&c))?;
    catalog::find_stored_belt(&name, category)
}

fn stripes(obj: &Object) -> u8 {
    let count = field::count(obj, &["stripeCount", "stripes"]).or(0);
    count.min(u32::from(MAX_BLACK_DEGREES)) as u8
}

fn reconcile_payment(
    obj: &Object,
    student_id: &str,
    index: usize,
    ctx: &ReconcileContext,
) -> Option<Payment> {
    // Without an amount or a status the entry is not a payment any more
    let amount = field::amount(obj, &["amount"]).ok()?;
    let status = field::string(obj, &["status"])
        .ok()
        .and_then(|s| PaymentStatus::parse(&s))?;

    Some(Payment {
        id: field::identifier(obj, &["id"]).or_else(|| format!("{student_id}-payment-{index}")),
        date: field::timestamp(obj, &["date"]).or(ctx.now),
        amount,
        status,
        plan: field::string(obj, &["plan"]).or_default(),
        due_date: field::timestamp(obj, &["dueDate"]).ok(),
    })
}

fn reconcile_history(
    obj: &Object,
    belt: &Belt,
    stripe_count: u8,
    start_date: DateTime<Utc>,
) -> Vec<Promotion> {
    let mut history: Vec<Promotion> = match field::array(obj, &["promotionHistory"]) {
        Field::Valid(entries) => entries
            .iter()
            .filter_map(|entry| match entry {
                Value::Object(entry) => Some(Promotion {
                    date: field::timestamp(entry, &["date"]).or(start_date),
                    belt: reconcile_belt(field::lookup(entry, &["belt"]).ok())
                        .unwrap_or_else(|| belt.clone()),
                    stripe_count: stripes(entry),
                }),
                _ => None,
            })
            .collect(),
        Field::Missing | Field::WrongType => Vec::new(),
    };

    // Stable: equal dates keep their stored order
    history.sort_by_key(|p| p.date);

    match history.last() {
        None => history.push(Promotion {
            date: start_date,
            belt: belt.clone(),
            stripe_count,
        }),
        Some(last) if !last.belt.same_rank(belt) || last.stripe_count != stripe_count => {
            // Rank was edited without a snapshot; close the history at the
            // current rank
            let date = last.date;
            history.push(Promotion {
                date,
                belt: belt.clone(),
                stripe_count,
            });
        }
        Some(_) => {}
    }

    history
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
