//! JSON file storage
//!
//! One file per section under `{work_dir}/data`. Writes go to a temporary
//! file that is renamed over the target, so a crash mid-write leaves the
//! previous version intact. A file that is not valid JSON is moved aside to
//! `{section}.json.corrupt` before reconciliation replaces it.

use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Storage, StorageError, StorageResult, StorageSection};

#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    data_dir: PathBuf,
}

impl JsonFileStorage {
    /// Storage rooted at `{work_dir}/data`
    pub fn new(work_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: work_dir.as_ref().join("data"),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, section: StorageSection) -> PathBuf {
        self.data_dir.join(format!("{}.json", section.as_str()))
    }
}

#[async_trait]
impl Storage for JsonFileStorage {
    async fn load(&self, section: StorageSection) -> StorageResult<Option<Value>> {
        let path = self.path_for(section);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Io { section, source }),
        };

        // Unparseable content is still "data": hand reconciliation a null
        // rather than failing the whole load
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                let aside = path.with_extension("json.corrupt");
                tracing::warn!(
                    section = %section,
                    path = %path.display(),
                    kept_as = %aside.display(),
                    "Stored JSON is unreadable: {e}"
                );
                if let Err(e) = tokio::fs::rename(&path, &aside).await {
                    tracing::error!(section = %section, "Failed to keep unreadable file: {e}");
                }
                Ok(Some(Value::Null))
            }
        }
    }

    async fn save(&self, section: StorageSection, data: &Value) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(data)
            .map_err(|source| StorageError::Serialization { section, source })?;

        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| StorageError::Io { section, source })?;

        let path = self.path_for(section);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|source| StorageError::Io { section, source })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| StorageError::Io { section, source })?;

        tracing::debug!(section = %section, bytes = bytes.len(), "Section saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_section_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path());
        assert!(storage.load(StorageSection::Students).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path());
        let data = json!([{"name": "Helio", "age": 22}]);

        storage.save(StorageSection::Students, &data).await.unwrap();
        let loaded = storage.load(StorageSection::Students).await.unwrap();

        assert_eq!(loaded, Some(data));
        assert!(storage.data_dir().join("students.json").exists());
        assert!(!storage.data_dir().join("students.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_null() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path());
        std::fs::create_dir_all(storage.data_dir()).unwrap();
        std::fs::write(storage.data_dir().join("app_settings.json"), b"{not json").unwrap();

        let loaded = storage.load(StorageSection::AppSettings).await.unwrap();
        assert_eq!(loaded, Some(Value::Null));

        let kept = std::fs::read(storage.data_dir().join("app_settings.json.corrupt")).unwrap();
        assert_eq!(kept, b"{not json");
        assert!(!storage.data_dir().join("app_settings.json").exists());
    }
}
