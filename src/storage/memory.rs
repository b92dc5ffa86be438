use super::{PrefValue, PreferenceStorage};
use crate::errors::{StorageError, StorageResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    values: BTreeMap<String, PrefValue>,
    fail_writes: bool,
    writes: usize,
}

/// In-process preference storage.
///
/// Clones share the same underlying map, so a handle kept by a test still
/// sees what a dropped store wrote, just like a platform preference store
/// outlives the objects that use it.
///
/// # Examples
///
/// ```
/// use kansha::storage::{MemoryPreferences, PreferenceStorage};
///
/// let prefs = MemoryPreferences::new();
/// let shared = prefs.clone();
/// prefs.set("kansha.username", "Aki".into()).unwrap();
/// assert_eq!(shared.get_string("kansha.username").unwrap().as_deref(), Some("Aki"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set`/`remove` fail with `StorageError::Rejected`.
    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_writes = fail;
        }
    }

    /// Number of successful writes (sets and removes) so far.
    pub fn write_count(&self) -> usize {
        self.state.lock().map(|state| state.writes).unwrap_or(0)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| StorageError::Rejected("preference state is poisoned".to_string()))
    }

    fn begin_write(&self) -> StorageResult<MutexGuard<'_, MemoryState>> {
        let state = self.lock()?;
        if state.fail_writes {
            return Err(StorageError::Rejected(
                "memory preferences are read-only".to_string(),
            ));
        }
        Ok(state)
    }
}

impl PreferenceStorage for MemoryPreferences {
    fn get(&self, key: &str) -> StorageResult<Option<PrefValue>> {
        Ok(self.lock()?.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: PrefValue) -> StorageResult<()> {
        let mut state = self.begin_write()?;
        state.values.insert(key.to_string(), value);
        state.writes += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut state = self.begin_write()?;
        state.values.remove(key);
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let prefs = MemoryPreferences::new();
        assert_eq!(prefs.get("k").unwrap(), None);

        prefs.set("k", PrefValue::Int(3)).unwrap();
        assert_eq!(prefs.get("k").unwrap(), Some(PrefValue::Int(3)));

        prefs.remove("k").unwrap();
        assert_eq!(prefs.get("k").unwrap(), None);
        assert_eq!(prefs.write_count(), 2);
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        let prefs = MemoryPreferences::new();
        assert!(prefs.remove("never-set").is_ok());
    }

    #[test]
    fn test_fail_writes_keeps_previous_value() {
        let prefs = MemoryPreferences::new();
        prefs.set("k", "before".into()).unwrap();

        prefs.fail_writes(true);
        assert!(matches!(
            prefs.set("k", "after".into()),
            Err(StorageError::Rejected(_))
        ));
        assert!(prefs.remove("k").is_err());
        assert_eq!(prefs.get_string("k").unwrap(), Some("before".to_string()));

        prefs.fail_writes(false);
        prefs.set("k", "after".into()).unwrap();
        assert_eq!(prefs.get_string("k").unwrap(), Some("after".to_string()));
    }

    #[test]
    fn test_clones_share_state() {
        let prefs = MemoryPreferences::new();
        let other = prefs.clone();
        other.set("shared", true.into()).unwrap();
        assert_eq!(prefs.get_bool("shared").unwrap(), Some(true));
    }
}
