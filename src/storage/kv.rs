//! Local key-value store
//!
//! Each key maps to one text document. `FileStore` keeps every key as
//! `<data_dir>/<key>.json`; `MemoryStore` keeps them in a map and is used
//! for tests and benchmarks.
//!
//! A missing key is not an error: `get` returns `None` and callers treat it
//! as an empty collection or an absent session.

use crate::storage::error::{StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key holding every registered doctor
pub const USERS_KEY: &str = "docqueue_users";
/// Key holding every appointment of every doctor
pub const APPOINTMENTS_KEY: &str = "docqueue_appointments";
/// Key holding the logged-in doctor
pub const CURRENT_USER_KEY: &str = "docqueue_current_user";

/// Raw text persistence keyed by name
pub trait KeyValueStore: Send + Sync {
    /// Read the document stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the document stored under `key`
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`; removing a missing key succeeds
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Read and decode a JSON document
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StorageResult<Option<T>> {
    match store.get(key)? {
        Some(text) => {
            let value = serde_json::from_str(&text).map_err(|e| {
                StorageError::Serialization(format!("key '{}': {}", key, e))
            })?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Encode a value as JSON and store it
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let text = serde_json::to_string_pretty(value)?;
    store.set(key, &text)
}

/// Directory-backed store, one file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Root directory of this store
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.key_path(key);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.key_path(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));

        // Rename keeps readers from ever seeing a half-written document
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;

        tracing::debug!(key = %key, bytes = value.len(), "Flushed key");
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StorageResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| StorageError::Lock(format!("Failed to acquire store lock: {}", e)))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_missing_key() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert_eq!(store.get(USERS_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_set_get_remove() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set(CURRENT_USER_KEY, "{\"a\":1}").unwrap();
        assert_eq!(
            store.get(CURRENT_USER_KEY).unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert!(store.key_path(CURRENT_USER_KEY).exists());

        store.remove(CURRENT_USER_KEY).unwrap();
        assert_eq!(store.get(CURRENT_USER_KEY).unwrap(), None);
        assert!(!store.key_path(CURRENT_USER_KEY).exists());

        // Removing twice is fine
        store.remove(CURRENT_USER_KEY).unwrap();
    }

    #[test]
    fn test_file_store_overwrite_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set(APPOINTMENTS_KEY, "[]").unwrap();
        store.set(APPOINTMENTS_KEY, "[1]").unwrap();

        assert_eq!(store.get(APPOINTMENTS_KEY).unwrap().as_deref(), Some("[1]"));
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["docqueue_appointments.json".to_string()]);
    }

    #[test]
    fn test_json_helpers() {
        let store = MemoryStore::new();

        let missing: Option<Vec<u32>> = load_json(&store, "numbers").unwrap();
        assert!(missing.is_none());

        save_json(&store, "numbers", &vec![101u32, 102]).unwrap();
        let loaded: Option<Vec<u32>> = load_json(&store, "numbers").unwrap();
        assert_eq!(loaded, Some(vec![101, 102]));
    }

    #[test]
    fn test_load_json_reports_key_on_bad_document() {
        let store = MemoryStore::new();
        store.set(USERS_KEY, "not json").unwrap();

        let err = load_json::<Vec<u32>>(&store, USERS_KEY).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
        assert!(err.to_string().contains(USERS_KEY));
    }
}
