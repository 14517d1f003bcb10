//! Whole-store backup and restore.
//!
//! A backup is one JSON object mapping each feature key to its raw
//! serialized value (or null when the key is absent). Restore is a raw
//! per-key overwrite with no validation beyond JSON parseability; the
//! application reloads its editors afterwards.

use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::store::{keys, CacheStore};

/// Keys included in a full backup.
pub const BACKUP_KEYS: &[&str] = &[
    keys::STAFF,
    keys::SCHOOLS,
    keys::MEMOS,
    keys::FORMS,
    keys::NEWS,
    keys::MAIL,
    keys::TICKER,
    keys::SETTINGS,
];

/// Export every feature key to a backup object.
pub fn export_all(cache: &CacheStore) -> Value {
    let mut backup = Map::new();
    for key in BACKUP_KEYS {
        let value = match cache.get_raw(key) {
            Some(raw) => Value::String(raw),
            None => Value::Null,
        };
        backup.insert((*key).to_string(), value);
    }
    Value::Object(backup)
}

/// Suggested file name for a downloaded backup, dated for easy sorting.
pub fn backup_file_name() -> String {
    format!(
        "backup_portal_{}.json",
        chrono::Utc::now().format("%Y-%m-%d")
    )
}

/// Restore feature keys from a backup object, overwriting each present key
/// verbatim. Returns the number of keys restored.
pub fn restore(cache: &CacheStore, backup: &Value) -> Result<usize, AppError> {
    let entries = backup
        .as_object()
        .ok_or_else(|| AppError::Validation("Backup file is not a JSON object".to_string()))?;

    let mut restored = 0;
    for key in BACKUP_KEYS {
        match entries.get(*key) {
            Some(Value::String(raw)) => {
                // Refuse values that are not themselves valid JSON; a broken
                // backup must not poison the cache.
                serde_json::from_str::<Value>(raw).map_err(|err| {
                    AppError::Validation(format!("Backup entry {:?} is not JSON: {}", key, err))
                })?;
                cache.set_raw(key, raw)?;
                restored += 1;
            }
            Some(Value::Null) | None => {}
            Some(_) => {
                return Err(AppError::Validation(format!(
                    "Backup entry {:?} has an unexpected type",
                    key
                )));
            }
        }
    }
    Ok(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::open(dir.path()).unwrap();

        cache.set(keys::STAFF, &json!([{"id": "d1"}])).unwrap();
        cache.set(keys::TICKER, &json!(["مرحبا"])).unwrap();
        cache.set(keys::SETTINGS, &json!({"maintenanceMode": false})).unwrap();

        let backup = export_all(&cache);
        assert_eq!(backup[keys::MEMOS], Value::Null);

        let originals: Vec<Option<String>> = BACKUP_KEYS
            .iter()
            .map(|key| cache.get_raw(key))
            .collect();

        for key in BACKUP_KEYS {
            cache.remove(key);
        }
        assert!(cache.get_raw(keys::STAFF).is_none());

        let restored = restore(&cache, &backup).unwrap();
        assert_eq!(restored, 3);

        for (key, original) in BACKUP_KEYS.iter().zip(originals) {
            assert_eq!(cache.get_raw(key), original);
        }
    }

    #[test]
    fn test_restore_rejects_non_object() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::open(dir.path()).unwrap();
        assert!(restore(&cache, &json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn test_restore_rejects_non_json_entry() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::open(dir.path()).unwrap();
        let backup = json!({ keys::STAFF: "{broken" });
        assert!(restore(&cache, &backup).is_err());
        assert!(cache.get_raw(keys::STAFF).is_none());
    }

    #[test]
    fn test_backup_file_name_is_dated() {
        let name = backup_file_name();
        assert!(name.starts_with("backup_portal_"));
        assert!(name.ends_with(".json"));
    }
}
