#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tatame_core::db::repository::graduation_policy::generate_default;
use tatame_core::services::{TipError, TipSource};
use tatame_core::{AcademyState, Config, MemoryStorage, Storage, StorageSection};

pub struct OfflineTip;

#[async_trait]
impl TipSource for OfflineTip {
    async fn fetch_tip(&self) -> Result<String, TipError> {
        Err(TipError::MissingApiKey)
    }
}

pub fn config(debounce_ms: u64) -> Config {
    let mut config = Config::with_work_dir(std::env::temp_dir().to_string_lossy().to_string());
    config.persist_debounce_ms = debounce_ms;
    config.shutdown_timeout_ms = 2000;
    config
}

/// Storage already holding valid, empty state, so startup writes nothing
pub fn settled_storage() -> MemoryStorage {
    MemoryStorage::new()
        .with_section(StorageSection::Students, json!([]))
        .with_section(
            StorageSection::GraduationSettings,
            serde_json::to_value(generate_default()).unwrap(),
        )
        .with_section(
            StorageSection::AppSettings,
            serde_json::to_value(shared::models::AppSettings::default()).unwrap(),
        )
}

pub async fn start(storage: Arc<dyn Storage>, config: Config) -> AcademyState {
    AcademyState::initialize_with_tip(config, storage, Arc::new(OfflineTip))
        .await
        .unwrap()
}

pub fn stored_students(storage: &MemoryStorage) -> Vec<Value> {
    match storage.get(StorageSection::Students) {
        Some(Value::Array(items)) => items,
        other => panic!("unexpected stored students: {other:?}"),
    }
}
