use super::*;
use chrono::TimeZone;
use proptest::prelude::*;
use serde_json::{Value, json};
use shared::models::{BeltCategory, GraduationPolicy, PaymentStatus, Student, Theme};

fn ctx() -> ReconcileContext {
    ReconcileContext::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
}

fn assert_valid(student: &Student) {
    assert!(student.stripe_count <= 6, "stripes out of range");
    assert!(
        crate::graduation::catalog::find_belt(&student.belt.name, student.belt.category).is_some(),
        "belt not in catalog"
    );
    assert!(student.history_is_consistent(), "history inconsistent: {student:?}");
}

fn round_trip(students: &[Student]) -> Vec<Student> {
    let serialized = serde_json::to_value(students).unwrap();
    reconcile_students_value(&serialized, &ctx())
}

// ========================================================================
// Students
// ========================================================================

#[test]
fn test_minimal_record_gets_defaults() {
    let students = reconcile_students(&[json!({"name": "X", "age": 20})], &ctx());
    assert_eq!(students.len(), 1);
    let s = &students[0];

    assert_eq!(s.name, "X");
    assert_eq!(s.age, 20);
    assert_eq!(s.belt.name, "White");
    assert_eq!(s.belt.category, BeltCategory::Adult);
    assert_eq!(s.stripe_count, 0);
    assert_eq!(s.classes_attended, 0);
    assert!(s.is_active);
    assert!(s.payments.is_empty());
    assert_eq!(s.start_date, ctx().now);
    assert_eq!(s.promotion_history.len(), 1);
    assert_eq!(s.promotion_history[0].belt, s.belt);
    assert_eq!(s.promotion_history[0].stripe_count, 0);
    assert_eq!(s.promotion_history[0].date, s.start_date);
}

#[test]
fn test_non_objects_are_dropped() {
    let raw = vec![
        Value::Null,
        json!(42),
        json!("student"),
        json!([1, 2]),
        json!(true),
        json!({"name": "kept"}),
    ];
    let students = reconcile_students(&raw, &ctx());
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].name, "kept");
}

#[test]
fn test_non_array_section_is_empty() {
    assert!(reconcile_students_value(&json!({"students": []}), &ctx()).is_empty());
    assert!(reconcile_students_value(&Value::Null, &ctx()).is_empty());
}

#[test]
fn test_kid_with_broken_belt_defaults_to_adult_white() {
    let raw = json!({"name": "Kid", "age": 9, "belt": {"name": "Grey"}});
    let s = &reconcile_students(&[raw], &ctx())[0];
    assert_eq!(s.belt.name, "White");
    assert_eq!(s.belt.category, BeltCategory::Adult);
}

#[test]
fn test_unknown_belt_defaults() {
    let raw = json!({"belt": {"name": "Pink", "category": "Adult"}});
    let s = &reconcile_students(&[raw], &ctx())[0];
    assert_eq!(s.belt.name, "White");
}

#[test]
fn test_valid_belt_is_normalized_to_catalog() {
    let raw = json!({"belt": {"name": "Grey", "colorToken": "#123456", "category": "Kid"}});
    let s = &reconcile_students(&[raw], &ctx())[0];
    assert_eq!(s.belt.name, "Grey");
    assert_eq!(s.belt.category, BeltCategory::Kid);
    assert_eq!(s.belt.color_token, "#808080");
}

#[test]
fn test_legacy_field_names() {
    let raw = json!({
        "id": "id_1",
        "name": "Helio",
        "belt": {"name": "Blue", "color": "#0000FF", "type": "Adult"},
        "stripes": 3,
    });
    let s = &reconcile_students(&[raw], &ctx())[0];
    assert_eq!(s.belt.name, "Blue");
    assert_eq!(s.stripe_count, 3);
}

#[test]
fn test_scalar_coercions() {
    let raw = json!({
        "id": 77,
        "name": 5,
        "age": "twenty",
        "stripeCount": "4",
        "classesAttended": -10,
        "isActive": "yes",
        "startDate": "not a date",
        "payments": {"0": {}},
        "phone": null,
    });
    let s = &reconcile_students(&[raw], &ctx())[0];
    assert_eq!(s.id, "77");
    assert_eq!(s.name, "");
    assert_eq!(s.age, 0);
    assert_eq!(s.stripe_count, 0);
    assert_eq!(s.classes_attended, 0);
    assert!(s.is_active);
    assert_eq!(s.start_date, ctx().now);
    assert!(s.payments.is_empty());
    assert_eq!(s.phone, "");
}

#[test]
fn test_stripes_are_clamped() {
    let raw = json!({"belt": {"name": "Black", "category": "Adult"}, "stripeCount": 11});
    let s = &reconcile_students(&[raw], &ctx())[0];
    assert_eq!(s.stripe_count, 6);
}

#[test]
fn test_missing_ids_are_positional() {
    let raw = vec![json!(null), json!({}), json!({"id": ""})];
    let students = reconcile_students(&raw, &ctx());
    assert_eq!(students[0].id, "recovered-1");
    assert_eq!(students[1].id, "recovered-2");
}

#[test]
fn test_payments_repair() {
    let raw = json!({
        "id": "s1",
        "payments": [
            {"id": "p1", "date": "2024-05-18T00:00:00Z", "amount": 150, "status": "Overdue", "plan": "Monthly"},
            {"amount": "99.90", "status": "Paid"},
            {"amount": -5, "status": "Paid"},
            {"amount": 10, "status": "Refunded"},
            "garbage",
        ]
    });
    let s = &reconcile_students(&[raw], &ctx())[0];
    assert_eq!(s.payments.len(), 2);
    assert_eq!(s.payments[0].id, "p1");
    assert_eq!(s.payments[0].status, PaymentStatus::Overdue);
    assert_eq!(s.payments[1].id, "s1-payment-1");
    assert_eq!(s.payments[1].date, ctx().now);
    assert_eq!(s.payments[1].plan, "");
}

#[test]
fn test_history_entries_repaired() {
    let raw = json!({
        "belt": {"name": "Blue", "category": "Adult"},
        "stripeCount": 1,
        "startDate": "2022-01-15T00:00:00Z",
        "promotionHistory": [
            "junk",
            {"date": "2022-01-15T00:00:00Z", "belt": {"name": "White", "category": "Adult"}, "stripeCount": 0},
            {"date": "2023-01-15T00:00:00Z", "belt": "blue", "stripes": 0},
            {"date": "2023-06-15T00:00:00Z", "belt": {"name": "Blue", "category": "Adult"}, "stripeCount": 1},
        ]
    });
    let s = &reconcile_students(&[raw], &ctx())[0];
    assert_eq!(s.promotion_history.len(), 3);
    assert_eq!(s.promotion_history[0].belt.name, "White");
    // Invalid belt borrows the student's belt
    assert_eq!(s.promotion_history[1].belt.name, "Blue");
    assert_valid(s);
}

#[test]
fn test_history_is_sorted_and_closed_at_current_rank() {
    let raw = json!({
        "belt": {"name": "Purple", "category": "Adult"},
        "stripeCount": 2,
        "startDate": "2020-01-01T00:00:00Z",
        "promotionHistory": [
            {"date": "2021-01-01T00:00:00Z", "belt": {"name": "Blue", "category": "Adult"}, "stripeCount": 0},
            {"date": "2020-01-01T00:00:00Z", "belt": {"name": "White", "category": "Adult"}, "stripeCount": 0},
        ]
    });
    let s = &reconcile_students(&[raw], &ctx())[0];
    let names: Vec<_> = s.promotion_history.iter().map(|p| p.belt.name.as_str()).collect();
    assert_eq!(names, vec!["White", "Blue", "Purple"]);
    assert_eq!(s.promotion_history[2].stripe_count, 2);
    assert_eq!(s.promotion_history[2].date, s.promotion_history[1].date);
    assert_valid(s);
}

#[test]
fn test_empty_history_is_synthesized() {
    let raw = json!({
        "belt": {"name": "Brown", "category": "Adult"},
        "stripeCount": 3,
        "startDate": "2019-03-01T00:00:00Z",
        "promotionHistory": [1, "x", null],
    });
    let s = &reconcile_students(&[raw], &ctx())[0];
    assert_eq!(s.promotion_history.len(), 1);
    assert_eq!(s.promotion_history[0].belt.name, "Brown");
    assert_eq!(s.promotion_history[0].stripe_count, 3);
    assert_eq!(s.promotion_history[0].date, s.start_date);
}

#[test]
fn test_valid_record_is_unchanged() {
    let raw = json!({"name": "Carlos", "age": 28, "belt": {"name": "Blue", "category": "Adult"}, "stripeCount": 2});
    let first = reconcile_students(&[raw], &ctx());
    assert_eq!(round_trip(&first), first);
}

#[test]
fn test_record_from_portuguese_release() {
    let raw = json!({
        "id": "lx2k9c",
        "name": "Carlos Gracie",
        "age": 28,
        "belt": {"name": "Azul", "color": "#0000FF", "type": "Adulto"},
        "stripes": 2,
        "classesAttended": 180,
        "startDate": "2022-01-15T00:00:00.000Z",
        "phone": "21 99999-0001",
        "address": "Rua do Tatame, 100, Rio de Janeiro",
        "payments": [
            {"id": "p1", "date": "2024-05-10T00:00:00.000Z", "amount": 150, "status": "Pago", "plan": "Mensal"},
            {"id": "p2", "date": "2024-04-10T00:00:00.000Z", "amount": 150, "status": "Boleto Gerado", "plan": "Mensal"}
        ],
        "isActive": true,
        "promotionHistory": [
            {"date": "2022-01-15T00:00:00.000Z", "belt": {"name": "Branca", "color": "#FFFFFF", "type": "Adulto"}, "stripes": 0},
            {"date": "2023-08-01T00:00:00.000Z", "belt": {"name": "Azul", "color": "#0000FF", "type": "Adulto"}, "stripes": 2}
        ]
    });
    let students = reconcile_students(&[raw], &ctx());
    let s = &students[0];

    assert_eq!(s.belt.name, "Blue");
    assert_eq!(s.belt.category, BeltCategory::Adult);
    assert_eq!(s.stripe_count, 2);
    assert_eq!(s.payments.len(), 2);
    assert_eq!(s.payments[0].status, PaymentStatus::Paid);
    assert_eq!(s.payments[1].status, PaymentStatus::Invoiced);
    assert_eq!(s.promotion_history.len(), 2);
    assert_eq!(s.promotion_history[0].belt.name, "White");
    assert_valid(s);
    assert_eq!(round_trip(&students), students);
}

#[test]
fn test_portuguese_kid_belt_keeps_category() {
    let raw = json!({"name": "Kid", "age": 9, "belt": {"name": "Cinza e Branca", "type": "Infantil"}});
    let s = &reconcile_students(&[raw], &ctx())[0];
    assert_eq!(s.belt.name, "Grey and White");
    assert_eq!(s.belt.category, BeltCategory::Kid);
}

#[test]
fn test_far_future_millis_fall_back_to_now() {
    let raw = json!({"name": "X", "age": 20, "startDate": 300_000_000_000_000_i64});
    let first = reconcile_students(&[raw], &ctx());
    assert_eq!(first[0].start_date, ctx().now);
    assert_eq!(round_trip(&first), first);
}

#[test]
fn test_sub_cent_amount_is_rounded_once() {
    let raw = json!({"name": "X", "payments": [{"amount": 10.005, "status": "Paid"}, {"amount": 99.999, "status": "Paid"}]});
    let first = reconcile_students(&[raw], &ctx());
    assert_eq!(first[0].payments[0].amount, rust_decimal::Decimal::from(10));
    assert_eq!(first[0].payments[1].amount, rust_decimal::Decimal::from(100));
    assert_eq!(round_trip(&first), first);
}

// ========================================================================
// Settings
// ========================================================================

#[test]
fn test_graduation_settings_legacy_format_regenerates() {
    let raw = json!({"Blue": {"classesForStripe": 10, "classesForBelt": 50}});
    let settings = reconcile_graduation_settings(&raw);
    assert_eq!(settings.len(), crate::graduation::catalog::all_belts().len());
    assert_eq!(settings["Blue-Adult"], GraduationPolicy::default());
}

#[test]
fn test_graduation_settings_keep_valid_entries() {
    let raw = json!({
        "Blue-Adult": {"classesForStripe": 10, "classesForBelt": 50},
        "Purple-Adult": {"classesPerStripe": 20, "classesPerBeltCycle": 100},
        "Brown-Adult": {"classesPerStripe": "many"},
        "Black-Adult": 7,
    });
    let settings = reconcile_graduation_settings(&raw);
    assert_eq!(settings.len(), 2);
    assert_eq!(settings["Blue-Adult"].classes_per_stripe, 10);
    assert_eq!(settings["Purple-Adult"].classes_per_belt_cycle, 100);
}

#[test]
fn test_graduation_settings_portuguese_keys_move_to_catalog_keys() {
    let raw = json!({
        "Azul-Adulto": {"classesForStripe": 12, "classesForBelt": 60},
        "Cinza-Infantil": {"classesForStripe": 8, "classesForBelt": 40},
        "Roxa-Adulto": {"classesForStripe": 1, "classesForBelt": 1},
        "Purple-Adult": {"classesPerStripe": 25, "classesPerBeltCycle": 125},
        "Rosa-Adulto": {"classesForStripe": 3, "classesForBelt": 9},
    });
    let settings = reconcile_graduation_settings(&raw);
    assert_eq!(settings.len(), 3);
    assert_eq!(settings["Blue-Adult"].classes_per_stripe, 12);
    assert_eq!(settings["Grey-Kid"].classes_per_belt_cycle, 40);
    assert_eq!(settings["Purple-Adult"].classes_per_stripe, 25);
}

#[test]
fn test_graduation_settings_non_object_regenerates() {
    assert_eq!(
        reconcile_graduation_settings(&json!([1, 2])).len(),
        crate::graduation::catalog::all_belts().len()
    );
}

#[test]
fn test_app_settings_merge_over_defaults() {
    let raw = json!({"theme": "light", "pixKey": "academy@pix"});
    let settings = reconcile_app_settings(&raw);
    assert_eq!(settings.theme, Theme::Light);
    assert_eq!(settings.pix_key, "academy@pix");
    assert_eq!(settings.plans, shared::models::default_plans());
}

#[test]
fn test_app_settings_plan_without_id_restores_defaults() {
    let raw = json!({"plans": [{"id": "a", "name": "Custom", "price": 10}, {"name": "No id", "price": 5}]});
    assert_eq!(reconcile_app_settings(&raw).plans, shared::models::default_plans());

    let raw = json!({"plans": [{"id": "a", "name": "Custom", "price": 10}]});
    let plans = reconcile_app_settings(&raw).plans;
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].name, "Custom");
}

#[test]
fn test_app_settings_non_object() {
    assert_eq!(reconcile_app_settings(&json!("dark")), shared::models::AppSettings::default());
}

// ========================================================================
// Properties
// ========================================================================

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-10i64..2000).prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        (-500i64..5000).prop_map(|cents| Value::from(cents as f64 / 100.0)),
        (0i64..10_000_000).prop_map(|mills| Value::from(mills as f64 / 1000.0)),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Value::from),
        prop_oneof![
            prop::sample::select(vec![
                "White",
                "Black",
                "Azul",
                "Adult",
                "Kid",
                "Adulto",
                "Paid",
                "Pago",
                "2023-05-20T10:00:00Z",
                "0001-01-01T00:00:00Z",
                "0001-01-01T00:00:00+01:00",
                "9999-12-31T23:59:59.999999999Z",
                "9999-12-31T23:59:59-01:00",
                "1999-12-31",
                "1000000000.01",
            ])
            .prop_map(String::from),
            "[a-z]{0,6}",
        ]
        .prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(
                prop::sample::select(vec![
                    "id",
                    "name",
                    "age",
                    "belt",
                    "category",
                    "type",
                    "stripeCount",
                    "stripes",
                    "classesAttended",
                    "startDate",
                    "date",
                    "payments",
                    "amount",
                    "status",
                    "dueDate",
                    "promotionHistory",
                    "isActive",
                ])
                .prop_map(String::from),
                inner,
                0..6,
            )
            .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_reconcile_is_total_and_valid(raw in prop::collection::vec(arb_json(), 0..8)) {
        let students = reconcile_students(&raw, &ctx());
        let objects = raw.iter().filter(|v| v.is_object()).count();
        prop_assert_eq!(students.len(), objects);
        for s in &students {
            prop_assert!(s.stripe_count <= 6);
            prop_assert!(s.history_is_consistent());
        }
    }

    #[test]
    fn prop_reconcile_is_idempotent(raw in prop::collection::vec(arb_json(), 0..8)) {
        let first = reconcile_students(&raw, &ctx());
        prop_assert_eq!(round_trip(&first), first);
    }
}
