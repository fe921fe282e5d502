//! Backup Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::app_settings::AppSettings;
use super::graduation::GraduationSettings;
use super::student::Student;

/// Current backup format version
pub const BACKUP_VERSION: u32 = 1;

/// Full application state moved between devices (数据备份)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    pub students: Vec<Student>,
    pub graduation_settings: GraduationSettings,
    pub app_settings: AppSettings,
}
