//! Key-value persistence seam.
//!
//! The application state talks to storage only through [`KeyValueStore`]:
//! whole JSON values under string keys. Values are wrapped in a versioned
//! envelope:
//!
//! ```json
//! { "version": 1, "data": [ ... ] }
//! ```
//!
//! Bare (unwrapped) values are read as version 1. Values from a newer
//! version are refused so an older build never overwrites them.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StorageError;

/// Current envelope version.
pub const PAYLOAD_VERSION: u32 = 1;

/// Persistent string-keyed JSON storage.
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StorageError>;
    fn save(&mut self, key: &str, value: &Value) -> Result<(), StorageError>;
    fn delete(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store, for tests and throwaway state.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail while reads keep working.
    pub fn with_failing_writes() -> Self {
        Self {
            entries: HashMap::new(),
            fail_writes: true,
        }
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "store is read-only",
            )));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<(), StorageError> {
        self.check_writable()?;
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.entries.remove(key);
        Ok(())
    }
}

/// Load and unwrap a versioned value; `Ok(None)` if the key is absent.
pub fn load_versioned<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(value) = store.load(key)? else {
        return Ok(None);
    };

    let (version, data) = match value {
        Value::Object(mut map) if map.contains_key("version") && map.contains_key("data") => {
            let version = map.get("version").and_then(Value::as_u64).unwrap_or(0);
            let data = map.remove("data").unwrap_or(Value::Null);
            (version, data)
        }
        other => (u64::from(PAYLOAD_VERSION), other),
    };

    if version > u64::from(PAYLOAD_VERSION) {
        return Err(StorageError::UnsupportedVersion {
            key: key.to_string(),
            found: u32::try_from(version).unwrap_or(u32::MAX),
            supported: PAYLOAD_VERSION,
        });
    }

    serde_json::from_value(data)
        .map(Some)
        .map_err(|source| StorageError::Malformed {
            key: key.to_string(),
            source,
        })
}

/// Wrap `value` in the current envelope and save it.
pub fn save_versioned<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let data = serde_json::to_value(value).map_err(|source| StorageError::Malformed {
        key: key.to_string(),
        source,
    })?;
    let envelope = serde_json::json!({ "version": PAYLOAD_VERSION, "data": data });
    store.save(key, &envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn versioned_roundtrip() {
        let mut store = MemoryStore::new();
        save_versioned(&mut store, "numbers", &vec![1, 2, 3]).unwrap();
        assert_eq!(store.load("numbers").unwrap().unwrap()["version"], 1);
        let loaded: Option<Vec<i32>> = load_versioned(&store, "numbers").unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn missing_key_is_none() {
        let store = MemoryStore::new();
        let loaded: Option<Vec<i32>> = load_versioned(&store, "numbers").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn bare_values_read_as_current_version() {
        let mut store = MemoryStore::new();
        store.save("numbers", &json!([4, 5])).unwrap();
        let loaded: Option<Vec<i32>> = load_versioned(&store, "numbers").unwrap();
        assert_eq!(loaded, Some(vec![4, 5]));
    }

    #[test]
    fn newer_versions_are_refused() {
        let mut store = MemoryStore::new();
        store.save("numbers", &json!({ "version": 7, "data": [1] })).unwrap();
        let err = load_versioned::<Vec<i32>, _>(&store, "numbers").unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedVersion { found: 7, .. }));
    }

    #[test]
    fn malformed_payload_names_key() {
        let mut store = MemoryStore::new();
        store.save("numbers", &json!({ "version": 1, "data": "nope" })).unwrap();
        let err = load_versioned::<Vec<i32>, _>(&store, "numbers").unwrap_err();
        assert!(err.to_string().contains("numbers"));
    }

    #[test]
    fn failing_store_rejects_writes() {
        let mut store = MemoryStore::with_failing_writes();
        assert!(store.save("k", &json!(1)).is_err());
        assert!(store.load("k").unwrap().is_none());
    }
}
