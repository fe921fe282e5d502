use chrono::{DateTime, Utc};

/// 获取当前 UTC 时间
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Generate a resource ID (student, payment, plan).
///
/// IDs are opaque strings: records restored from older backups keep whatever
/// string they were stored with, new records get a v4 UUID.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
