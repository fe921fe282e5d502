//! Student Repository
//!
//! Sole owner of the roster. Rank changes always go through here so the
//! promotion history stays in step with the current belt.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Belt, BeltCategory, Payment, PaymentCreate, Promotion, Student, StudentCreate, StudentUpdate,
};

use crate::graduation::catalog;
use crate::graduation::promotion::{PromotionOutcome, next_rank};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_age, validate_amount,
    validate_date, validate_optional_text, validate_required_text,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentRepository {
    students: Vec<Student>,
}

impl StudentRepository {
    pub fn new(students: Vec<Student>) -> Self {
        Self { students }
    }

    pub fn list(&self) -> Vec<Student> {
        self.students.clone()
    }

    pub fn get(&self, id: &str) -> Option<Student> {
        self.students.iter().find(|s| s.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Bulk overwrite, used by restore. Input is expected to be reconciled.
    pub fn replace_all(&mut self, students: Vec<Student>) {
        self.students = students;
    }

    /// Enroll a new student.
    ///
    /// Category comes from the age and is fixed from here on. The belt
    /// defaults to the white belt of that category.
    pub fn add_student(&mut self, data: StudentCreate) -> AppResult<Student> {
        let name = data.name.trim();
        validate_required_text(name, "name", MAX_NAME_LEN)?;
        let age = validate_age(data.age)?;
        validate_optional_text(data.phone.as_deref(), "phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(data.address.as_deref(), "address", MAX_ADDRESS_LEN)?;
        validate_date(data.start_date.as_ref(), "startDate")?;

        let category = BeltCategory::for_age(age);
        let belt_name = data
            .belt_name
            .as_deref()
            .unwrap_or(catalog::STARTING_BELT_NAME);
        let belt = catalog::find_belt(belt_name, category).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::BeltNotFound,
                format!("{belt_name} is not a {category} belt"),
            )
            .with_detail("belt", belt_name)
            .with_detail("category", category.as_str())
        })?;

        let start_date = data.start_date.unwrap_or_else(shared::util::now);
        let student = Student {
            id: shared::util::generate_id(),
            name: name.to_string(),
            age,
            promotion_history: vec![Promotion {
                date: start_date,
                belt: belt.clone(),
                stripe_count: 0,
            }],
            belt,
            stripe_count: 0,
            classes_attended: 0,
            start_date,
            phone: data.phone.unwrap_or_default(),
            address: data.address.unwrap_or_default(),
            payments: Vec::new(),
            is_active: data.is_active.unwrap_or(true),
        };

        tracing::info!(
            student_id = %student.id,
            belt = %student.belt,
            "Student enrolled"
        );
        self.students.push(student.clone());
        Ok(student)
    }

    /// Edit profile fields and optionally assign a rank by hand.
    ///
    /// A manual rank stays within the student's category but may be any
    /// belt, Coral and Red included. It is recorded in the history like a
    /// promotion.
    pub fn update_student(&mut self, id: &str, data: StudentUpdate) -> AppResult<Student> {
        let index = self.index_of(id)?;
        let current = &self.students[index];

        let name = data.name.as_deref().map(str::trim);
        if let Some(name) = name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        let age = data.age.map(validate_age).transpose()?;
        validate_optional_text(data.phone.as_deref(), "phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(data.address.as_deref(), "address", MAX_ADDRESS_LEN)?;
        validate_date(data.start_date.as_ref(), "startDate")?;

        let rank = if data.belt_name.is_some() || data.stripe_count.is_some() {
            let category = current.category();
            let belt = match data.belt_name.as_deref() {
                Some(belt_name) => catalog::find_belt(belt_name, category).ok_or_else(|| {
                    AppError::with_message(
                        ErrorCode::BeltNotFound,
                        format!("{belt_name} is not a {category} belt"),
                    )
                    .with_detail("belt", belt_name)
                })?,
                None => current.belt.clone(),
            };
            // A belt change without an explicit count starts from zero
            let stripe_count = match (data.stripe_count, data.belt_name.is_some()) {
                (Some(count), _) => count,
                (None, true) => 0,
                (None, false) => current.stripe_count,
            };
            if stripe_count > belt.max_stripes() {
                return Err(AppError::with_message(
                    ErrorCode::StripeOutOfRange,
                    format!(
                        "{} allows at most {} stripes, got {stripe_count}",
                        belt,
                        belt.max_stripes()
                    ),
                )
                .with_detail("stripeCount", stripe_count));
            }
            Some((belt, stripe_count))
        } else {
            None
        };

        // Validation done; apply
        let student = &mut self.students[index];
        if let Some(name) = name {
            student.name = name.to_string();
        }
        if let Some(age) = age {
            student.age = age;
        }
        if let Some(phone) = data.phone {
            student.phone = phone;
        }
        if let Some(address) = data.address {
            student.address = address;
        }
        if let Some(start_date) = data.start_date {
            student.start_date = start_date;
        }
        if let Some(is_active) = data.is_active {
            student.is_active = is_active;
        }
        if let Some((belt, stripe_count)) = rank {
            let changed = !student.belt.same_rank(&belt) || student.stripe_count != stripe_count;
            if changed {
                tracing::info!(
                    student_id = %student.id,
                    from = %student.belt,
                    to = %belt,
                    stripe_count,
                    "Manual rank assignment"
                );
                record_rank(student, belt, stripe_count);
            }
        }

        Ok(student.clone())
    }

    /// Count one class for the student
    pub fn log_attendance(&mut self, id: &str) -> AppResult<Student> {
        let index = self.index_of(id)?;
        let student = &mut self.students[index];
        student.classes_attended = student.classes_attended.saturating_add(1);
        tracing::debug!(
            student_id = %student.id,
            classes_attended = student.classes_attended,
            "Attendance logged"
        );
        Ok(student.clone())
    }

    /// Register a payment; the newest payment is kept first
    pub fn record_payment(&mut self, id: &str, data: PaymentCreate) -> AppResult<Payment> {
        validate_amount(data.amount, "amount")?;
        validate_optional_text(Some(data.plan.as_str()), "plan", MAX_NAME_LEN)?;
        validate_date(data.date.as_ref(), "date")?;
        validate_date(data.due_date.as_ref(), "dueDate")?;
        let index = self.index_of(id)?;

        let payment = Payment {
            id: shared::util::generate_id(),
            date: data.date.unwrap_or_else(shared::util::now),
            amount: data.amount,
            status: data.status,
            plan: data.plan,
            due_date: data.due_date,
        };
        let student = &mut self.students[index];
        student.payments.insert(0, payment.clone());

        tracing::info!(
            student_id = %student.id,
            payment_id = %payment.id,
            amount = %payment.amount,
            status = %payment.status,
            "Payment recorded"
        );
        Ok(payment)
    }

    /// Advance the student one step. Rejections leave the student untouched.
    pub fn promote(&mut self, id: &str) -> PromotionOutcome {
        let Some(student) = self.students.iter_mut().find(|s| s.id == id) else {
            tracing::warn!(student_id = %id, "Promotion requested for unknown student");
            return PromotionOutcome::StudentNotFound;
        };

        match next_rank(&student.belt, student.stripe_count) {
            Ok(step) => {
                tracing::info!(
                    student_id = %student.id,
                    from = %student.belt,
                    to = %step.belt,
                    stripe_count = step.stripe_count,
                    kind = ?step.kind,
                    "Student promoted"
                );
                record_rank(student, step.belt, step.stripe_count);
                PromotionOutcome::Promoted {
                    student: student.clone(),
                    kind: step.kind,
                }
            }
            Err(reason) => {
                tracing::info!(student_id = %student.id, %reason, "Promotion rejected");
                PromotionOutcome::Rejected(reason)
            }
        }
    }

    fn index_of(&self, id: &str) -> AppResult<usize> {
        self.students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| AppError::student_not_found(id))
    }
}

/// Set the rank and append the matching history snapshot
fn record_rank(student: &mut Student, belt: Belt, stripe_count: u8) {
    // Keep history chronological even if the clock went backwards
    let latest = student.promotion_history.last().map(|p| p.date);
    let date = match latest {
        Some(last) => last.max(shared::util::now()),
        None => shared::util::now(),
    };
    student.belt = belt.clone();
    student.stripe_count = stripe_count;
    student.promotion_history.push(Promotion {
        date,
        belt,
        stripe_count,
    });
}
