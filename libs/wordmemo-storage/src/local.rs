//! Local key-value backend.
//!
//! A synchronous string map scoped to one data directory, optionally mirrored
//! to a JSON file. Non-string values are stored as JSON text; loads parse JSON
//! when they can and hand back the raw string otherwise.

use crate::backend::{BackendKind, PersistenceBackend};
use crate::error::{Result, StorageError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

type Entries = HashMap<String, String>;

pub struct LocalBackend {
    entries: Mutex<Entries>,
    path: Option<PathBuf>,
    quota_bytes: usize,
}

impl LocalBackend {
    /// Store mirrored to the JSON file at `path`.
    pub fn new(path: impl Into<PathBuf>, quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            path: Some(path.into()),
            quota_bytes,
        }
    }

    /// Store that lives only as long as the process.
    pub fn in_memory(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            path: None,
            quota_bytes,
        }
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        used_bytes(&self.entries())
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, entries: &Entries) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec(entries)?)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn used_bytes(entries: &Entries) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

fn serialize(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Ok(serde_json::to_string(other)?),
    }
}

#[async_trait]
impl PersistenceBackend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn init(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }

        let raw = std::fs::read(path).map_err(|e| StorageError::Initialization {
            backend: "local",
            message: format!("{}: {e}", path.display()),
        })?;
        let stored: Entries =
            serde_json::from_slice(&raw).map_err(|e| StorageError::Initialization {
                backend: "local",
                message: format!("{}: {e}", path.display()),
            })?;

        tracing::debug!(entries = stored.len(), path = %path.display(), "loaded local store");
        *self.entries() = stored;
        Ok(())
    }

    async fn save(&self, key: &str, value: &Value) -> Result<()> {
        let serialized = serialize(value)?;
        let mut entries = self.entries();

        let existing = entries.get(key).map_or(0, |v| key.len() + v.len());
        let needed = used_bytes(&entries) - existing + key.len() + serialized.len();
        if needed > self.quota_bytes {
            return Err(StorageError::QuotaExceeded {
                needed,
                quota: self.quota_bytes,
            });
        }

        let previous = entries.insert(key.to_string(), serialized);
        if let Err(e) = self.flush(&entries) {
            match previous {
                Some(prev) => entries.insert(key.to_string(), prev),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<Value>> {
        let entries = self.entries();
        Ok(entries.get(key).map(|raw| {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()))
        }))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries();
        if let Some(previous) = entries.remove(key) {
            if let Err(e) = self.flush(&entries) {
                entries.insert(key.to_string(), previous);
                return Err(e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LOCAL_QUOTA_BYTES;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn structured_values_round_trip() {
        let store = LocalBackend::in_memory(DEFAULT_LOCAL_QUOTA_BYTES);
        let stats = json!({"correct": 3, "wrong": 1});

        store.save("stats", &stats).await.unwrap();
        assert_eq!(store.load("stats").await.unwrap(), Some(stats));
    }

    #[tokio::test]
    async fn freeform_strings_come_back_raw() {
        let store = LocalBackend::in_memory(DEFAULT_LOCAL_QUOTA_BYTES);
        let text = json!("aunt [ɑ:nt]\nn. 阿姨");

        store.save("wordBank", &text).await.unwrap();
        assert_eq!(store.load("wordBank").await.unwrap(), Some(text));
    }

    #[tokio::test]
    async fn json_looking_strings_are_parsed_on_load() {
        let store = LocalBackend::in_memory(DEFAULT_LOCAL_QUOTA_BYTES);
        store.save("stats", &json!(r#"{"correct":1}"#)).await.unwrap();
        assert_eq!(store.load("stats").await.unwrap(), Some(json!({"correct": 1})));
    }

    #[tokio::test]
    async fn missing_key_is_none_and_remove_is_idempotent() {
        let store = LocalBackend::in_memory(DEFAULT_LOCAL_QUOTA_BYTES);
        assert_eq!(store.load("nothing").await.unwrap(), None);
        store.remove("nothing").await.unwrap();

        store.save("k", &json!([1, 2])).await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.load("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn quota_exceeded_is_reported_and_not_applied() {
        let store = LocalBackend::in_memory(16);
        store.save("a", &json!("0123456789")).await.unwrap();

        let err = store.save("b", &json!("0123456789")).await.unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { needed: 22, quota: 16 }));
        assert_eq!(store.load("b").await.unwrap(), None);
        assert_eq!(store.used_bytes(), 11);
    }

    #[tokio::test]
    async fn overwrite_counts_only_the_new_value() {
        let store = LocalBackend::in_memory(16);
        store.save("a", &json!("0123456789")).await.unwrap();
        store.save("a", &json!("9876543210")).await.unwrap();
        assert_eq!(store.used_bytes(), 11);
    }

    #[tokio::test]
    async fn file_mirror_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("local-storage.json");

        let store = LocalBackend::new(&path, DEFAULT_LOCAL_QUOTA_BYTES);
        store.init().await.unwrap();
        store.save("stats", &json!({"correct": 2, "wrong": 0})).await.unwrap();
        drop(store);

        let reopened = LocalBackend::new(&path, DEFAULT_LOCAL_QUOTA_BYTES);
        reopened.init().await.unwrap();
        assert_eq!(
            reopened.load("stats").await.unwrap(),
            Some(json!({"correct": 2, "wrong": 0}))
        );
    }

    #[tokio::test]
    async fn corrupt_mirror_fails_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-storage.json");
        std::fs::write(&path, "not json").unwrap();

        let store = LocalBackend::new(&path, DEFAULT_LOCAL_QUOTA_BYTES);
        assert!(matches!(
            store.init().await,
            Err(StorageError::Initialization { backend: "local", .. })
        ));
    }
}
