//! In-memory storage with failure injection, for tests and ephemeral hosts

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{Storage, StorageError, StorageResult, StorageSection};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    sections: Mutex<HashMap<StorageSection, Value>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a section
    pub fn with_section(self, section: StorageSection, data: Value) -> Self {
        self.sections.lock().insert(section, data);
        self
    }

    /// Current stored value of a section
    pub fn get(&self, section: StorageSection) -> Option<Value> {
        self.sections.lock().get(&section).cloned()
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load(&self, section: StorageSection) -> StorageResult<Option<Value>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("load {section} refused")));
        }
        Ok(self.get(section))
    }

    async fn save(&self, section: StorageSection, data: &Value) -> StorageResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("save {section} refused")));
        }
        self.sections.lock().insert(section, data.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
