//! Restart-surviving key-value preference storage.
//!
//! Everything kansha persists goes through the `PreferenceStorage` trait: the
//! entry store blob, profile and display settings, and the record of the
//! scheduled reminder. Values are small and typed loosely (`PrefValue`), the
//! way a platform preference store would hold them.
//!
//! Two backends are provided:
//! - [`FilePreferences`]: a JSON document in the data directory, replaced
//!   atomically on every write.
//! - [`MemoryPreferences`]: an in-process map behind a cloneable handle, used
//!   by tests and anywhere persistence is not wanted.

mod file;
mod memory;

pub use file::FilePreferences;
pub use memory::MemoryPreferences;

use crate::errors::{StorageError, StorageResult};
use serde::{Deserialize, Serialize};

/// A single stored preference value.
///
/// Serialized untagged, so the preference document reads as plain JSON:
/// `{"kansha.darkMode": true, "kansha.reminderHour": 21, "kansha.accent": "blue"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl PrefValue {
    fn type_name(&self) -> &'static str {
        match self {
            PrefValue::Bool(_) => "boolean",
            PrefValue::Int(_) => "integer",
            PrefValue::Text(_) => "string",
        }
    }
}

impl From<bool> for PrefValue {
    fn from(value: bool) -> Self {
        PrefValue::Bool(value)
    }
}

impl From<i64> for PrefValue {
    fn from(value: i64) -> Self {
        PrefValue::Int(value)
    }
}

impl From<String> for PrefValue {
    fn from(value: String) -> Self {
        PrefValue::Text(value)
    }
}

impl From<&str> for PrefValue {
    fn from(value: &str) -> Self {
        PrefValue::Text(value.to_string())
    }
}

/// Generic get/set/remove of small values keyed by string.
///
/// Implementations must complete each write before returning, so two writes
/// issued in order are applied in that order.
pub trait PreferenceStorage {
    /// Reads a value; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<PrefValue>>;

    /// Writes a value, replacing any previous one.
    fn set(&self, key: &str, value: PrefValue) -> StorageResult<()>;

    /// Removes a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Reads a string value.
    fn get_string(&self, key: &str) -> StorageResult<Option<String>> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Text(text)) => Ok(Some(text)),
            Some(other) => Err(mismatch(key, "string", &other)),
        }
    }

    /// Reads a boolean value.
    fn get_bool(&self, key: &str) -> StorageResult<Option<bool>> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Bool(flag)) => Ok(Some(flag)),
            Some(other) => Err(mismatch(key, "boolean", &other)),
        }
    }

    /// Reads an integer value.
    fn get_int(&self, key: &str) -> StorageResult<Option<i64>> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Int(number)) => Ok(Some(number)),
            Some(other) => Err(mismatch(key, "integer", &other)),
        }
    }
}

fn mismatch(key: &str, expected: &'static str, found: &PrefValue) -> StorageError {
    tracing::debug!(key, expected, found = found.type_name(), "Preference type mismatch");
    StorageError::TypeMismatch {
        key: key.to_string(),
        expected,
    }
}

impl<T: PreferenceStorage + ?Sized> PreferenceStorage for &T {
    fn get(&self, key: &str) -> StorageResult<Option<PrefValue>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: PrefValue) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pref_value_untagged_json() {
        let values = vec![
            PrefValue::from(true),
            PrefValue::from(21_i64),
            PrefValue::from("purple"),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[true,21,"purple"]"#);

        let back: Vec<PrefValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_typed_getters() {
        let prefs = MemoryPreferences::new();
        prefs.set("name", "Aki".into()).unwrap();
        prefs.set("dark", true.into()).unwrap();
        prefs.set("hour", 7_i64.into()).unwrap();

        assert_eq!(prefs.get_string("name").unwrap(), Some("Aki".to_string()));
        assert_eq!(prefs.get_bool("dark").unwrap(), Some(true));
        assert_eq!(prefs.get_int("hour").unwrap(), Some(7));
        assert_eq!(prefs.get_int("missing").unwrap(), None);
    }

    #[test]
    fn test_typed_getter_mismatch() {
        let prefs = MemoryPreferences::new();
        prefs.set("hour", "seven".into()).unwrap();

        match prefs.get_int("hour") {
            Err(StorageError::TypeMismatch { key, expected }) => {
                assert_eq!(key, "hour");
                assert_eq!(expected, "integer");
            }
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_forwards_to_backend() {
        let prefs = MemoryPreferences::new();
        let by_ref: &MemoryPreferences = &prefs;
        PreferenceStorage::set(&by_ref, "k", "v".into()).unwrap();
        assert_eq!(prefs.get_string("k").unwrap(), Some("v".to_string()));
    }
}
