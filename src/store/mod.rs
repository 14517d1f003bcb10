//! Local cache module: durable key-value persistence.
//!
//! The cache is the durable leg of every write in the application. It stores
//! one JSON file per key under a data directory, read and written
//! synchronously as whole values; there is no partial update anywhere.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;

/// Cache key constants, versioned by suffix. A suffix bump means the stored
/// shape changed incompatibly.
pub mod keys {
    pub const STAFF: &str = "dir_staff_v14";
    pub const SCHOOLS: &str = "dir_schools_v37";
    pub const MEMOS: &str = "dir_memos_v1";
    pub const FORMS: &str = "dir_forms_v2";
    pub const NEWS: &str = "dir_news_v1";
    pub const MAIL: &str = "dir_mail_v1";
    pub const TICKER: &str = "dir_ticker_v1";
    pub const SETTINGS: &str = "app_global_settings_v1";
    pub const SESSION: &str = "app_session_v4";
}

/// Durable key-value store, one JSON file per key.
///
/// All features share one store and are disambiguated only by key naming
/// convention, so distinct keys must never collide on disk.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Open (creating if needed) a cache rooted at the given directory.
    pub fn open(root: &Path) -> Result<Self, AppError> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Read the value stored under `key`, or `None` if absent.
    ///
    /// A corrupt file is treated as absent and logged, never propagated.
    pub fn get(&self, key: &str) -> Option<Value> {
        let path = self.key_path(key);
        let raw = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!("Unreadable cache entry {:?}: {}", key, err);
                None
            }
        }
    }

    /// Read the raw serialized string stored under `key`.
    ///
    /// Used by backup export, which must round-trip values byte-identically.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    /// Replace the value stored under `key`.
    pub fn set(&self, key: &str, value: &Value) -> Result<(), AppError> {
        let serialized = serde_json::to_string(value)?;
        self.set_raw(key, &serialized)
    }

    /// Replace the raw serialized string stored under `key`.
    pub fn set_raw(&self, key: &str, raw: &str) -> Result<(), AppError> {
        fs::write(self.key_path(key), raw)?;
        Ok(())
    }

    /// Read and deserialize the value stored under `key`.
    ///
    /// A value that no longer matches the expected shape is treated as
    /// absent; the caller falls back to its seed data.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(err) => {
                tracing::warn!("Cache entry {:?} has unexpected shape: {}", key, err);
                None
            }
        }
    }

    /// Serialize and store a value under `key`.
    pub fn set_as<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let serialized = serde_json::to_string(value).map_err(|err| {
            AppError::Storage(format!("Cannot serialize value for {:?}: {}", key, err))
        })?;
        self.set_raw(key, &serialized)
    }

    /// Remove the entry under `key`, if any.
    pub fn remove(&self, key: &str) {
        let path = self.key_path(key);
        if let Err(err) = fs::remove_file(&path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove cache entry {:?}: {}", key, err);
            }
        }
    }

    /// Whether an entry exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.key_path(key).exists()
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Map a cache key to a safe file name. Keys are ASCII identifiers by
/// convention; anything else is replaced so no two keys can alias.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn open_store() -> (CacheStore, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let store = CacheStore::open(dir.path()).expect("open store");
        (store, dir)
    }

    #[test]
    fn test_get_absent_key() {
        let (store, _dir) = open_store();
        assert!(store.get("missing").is_none());
        assert!(!store.contains("missing"));
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let (store, _dir) = open_store();
        let value = json!({"items": [1, 2, 3], "name": "قائمة"});
        store.set(keys::STAFF, &value).unwrap();
        assert_eq!(store.get(keys::STAFF), Some(value));
    }

    #[test]
    fn test_set_is_whole_value_replacement() {
        let (store, _dir) = open_store();
        store.set("k", &json!({"a": 1, "b": 2})).unwrap();
        store.set("k", &json!({"a": 9})).unwrap();
        assert_eq!(store.get("k"), Some(json!({"a": 9})));
    }

    #[test]
    fn test_corrupt_entry_reads_as_absent() {
        let (store, dir) = open_store();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        assert!(store.get("bad").is_none());
    }

    #[test]
    fn test_typed_helpers() {
        let (store, _dir) = open_store();
        store.set_as("nums", &vec![10u32, 20, 30]).unwrap();
        let nums: Vec<u32> = store.get_as("nums").unwrap();
        assert_eq!(nums, vec![10, 20, 30]);
        // Shape mismatch is treated as absent
        let wrong: Option<Vec<String>> = store.get_as("nums");
        assert!(wrong.is_none());
    }

    #[test]
    fn test_remove() {
        let (store, _dir) = open_store();
        store.set("gone", &json!(1)).unwrap();
        store.remove("gone");
        assert!(store.get("gone").is_none());
        // Removing again is a no-op
        store.remove("gone");
    }

    #[test]
    fn test_feature_keys_do_not_alias() {
        let (store, _dir) = open_store();
        store.set(keys::STAFF, &json!("a")).unwrap();
        store.set(keys::SCHOOLS, &json!("b")).unwrap();
        store.set("local_app_config_global_settings", &json!("c")).unwrap();
        assert_eq!(store.get(keys::STAFF), Some(json!("a")));
        assert_eq!(store.get(keys::SCHOOLS), Some(json!("b")));
        assert_eq!(store.get("local_app_config_global_settings"), Some(json!("c")));
    }
}
