//! Data Transfer - full backup export/import as JSON text
//!
//! Export: serialize the three state sections into one document.
//! Import: check the document shape, then reconcile every section. Decoding
//! never touches live state; the caller swaps stores only after it succeeds.

use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{BACKUP_VERSION, BackupData};

use crate::reconcile::{
    ReconcileContext, reconcile_app_settings, reconcile_graduation_settings,
    reconcile_students_value,
};

/// Serialize a backup to JSON text
pub fn export(data: &BackupData) -> AppResult<String> {
    serde_json::to_string(data)
        .map_err(|e| AppError::internal(format!("Failed to serialize backup: {e}")))
}

/// Decode backup text into reconciled state.
///
/// Rejected: empty text, invalid JSON, a non-object document, `students`
/// that is not an array, settings sections that are not objects, or a
/// format version newer than this build understands. Documents without a
/// version are from before versioning and are read as version 1.
pub fn import(text: &str, ctx: &ReconcileContext) -> AppResult<BackupData> {
    if text.trim().is_empty() {
        return Err(AppError::new(ErrorCode::BackupEmpty));
    }

    let root: Value = serde_json::from_str(text).map_err(|e| {
        AppError::with_message(ErrorCode::BackupMalformed, format!("Backup is not valid JSON: {e}"))
    })?;
    let Value::Object(doc) = root else {
        return Err(invalid("document is not an object"));
    };

    let version = match doc.get("version") {
        None | Some(Value::Null) => BACKUP_VERSION,
        Some(v) => v
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| invalid("version is not a number"))?,
    };
    if version > BACKUP_VERSION {
        return Err(invalid(format!(
            "backup version {version} is newer than supported version {BACKUP_VERSION}"
        ))
        .with_detail("version", version));
    }

    let students = match doc.get("students") {
        Some(v @ Value::Array(_)) => v,
        _ => return Err(invalid("students must be an array")),
    };
    let graduation_settings = match doc.get("graduationSettings") {
        Some(v @ Value::Object(_)) => v,
        _ => return Err(invalid("graduationSettings must be an object")),
    };
    let app_settings = match doc.get("appSettings") {
        Some(v @ Value::Object(_)) => v,
        _ => return Err(invalid("appSettings must be an object")),
    };

    let exported_at = doc
        .get("exportedAt")
        .and_then(Value::as_str)
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&chrono::Utc));

    let data = BackupData {
        version,
        exported_at,
        students: reconcile_students_value(students, ctx),
        graduation_settings: reconcile_graduation_settings(graduation_settings),
        app_settings: reconcile_app_settings(app_settings),
    };

    tracing::info!(
        version,
        students = data.students.len(),
        belts = data.graduation_settings.len(),
        "Backup decoded"
    );
    Ok(data)
}

fn invalid(reason: impl Into<String>) -> AppError {
    let reason = reason.into();
    AppError::with_message(
        ErrorCode::BackupInvalidStructure,
        format!("Backup is invalid or corrupted: {reason}"),
    )
}
