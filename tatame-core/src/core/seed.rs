//! Demo roster written on first start when `SEED_DEMO_DATA` is enabled

use serde_json::{Value, json};
use shared::models::Student;

use crate::reconcile::{ReconcileContext, reconcile_students};

/// Three example students. History is left out and synthesized by
/// reconciliation, the same as for records written by older versions.
pub fn demo_students(ctx: &ReconcileContext) -> Vec<Student> {
    let now = ctx.now.to_rfc3339();
    let raw: Vec<Value> = vec![
        json!({
            "id": shared::util::generate_id(),
            "name": "Carlos Gracie",
            "age": 28,
            "belt": {"name": "Blue", "category": "Adult"},
            "stripeCount": 2,
            "classesAttended": 180,
            "startDate": "2022-01-15T00:00:00Z",
            "phone": "21 99999-0001",
            "address": "Rua do Tatame, 100, Rio de Janeiro",
            "payments": [{"id": shared::util::generate_id(), "date": now, "amount": 150, "status": "Paid", "plan": "Monthly"}],
            "isActive": true,
        }),
        json!({
            "id": shared::util::generate_id(),
            "name": "Helio Gracie",
            "age": 22,
            "belt": {"name": "White", "category": "Adult"},
            "stripeCount": 4,
            "classesAttended": 110,
            "startDate": "2023-05-20T00:00:00Z",
            "phone": "21 99999-0002",
            "address": "Avenida da Guarda, 200, Rio de Janeiro",
            "payments": [{"id": shared::util::generate_id(), "date": "2024-05-18T00:00:00Z", "amount": 150, "status": "Overdue", "plan": "Monthly"}],
            "isActive": true,
        }),
        json!({
            "id": shared::util::generate_id(),
            "name": "Rickson Gracie",
            "age": 58,
            "belt": {"name": "Black", "category": "Adult"},
            "stripeCount": 6,
            "classesAttended": 2500,
            "startDate": "1990-01-15T00:00:00Z",
            "phone": "21 99999-0003",
            "address": "Rua da Lenda, 1, Rio de Janeiro",
            "payments": [{"id": shared::util::generate_id(), "date": now, "amount": 150, "status": "Paid", "plan": "Monthly"}],
            "isActive": true,
        }),
    ];
    reconcile_students(&raw, ctx)
}
