//! In-memory preference store.
//!
//! Nothing survives the process. Used by tests, the CLI's ephemeral mode and as
//! a stand-in wherever a host offers no persistent storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{PreferenceStore, StorageError, StorageResult};

/// Preference store backed by a `HashMap`.
///
/// Access can be switched to [`StorageError::Denied`] to emulate a host that
/// blocks third-party storage, and every backend call is counted.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
    denied: AtomicBool,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

impl MemoryPreferenceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding a single `key`/`value` pair.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        store
    }

    /// Makes every subsequent call fail with [`StorageError::Denied`].
    pub fn deny_access(&self, denied: bool) {
        self.denied.store(denied, Ordering::SeqCst);
    }

    /// Number of `get` calls received.
    #[must_use]
    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of `set` calls received.
    #[must_use]
    pub fn set_calls(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    /// Reads a value without counting the access or honouring the deny switch.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn check_access(&self) -> StorageResult<()> {
        if self.denied.load(Ordering::SeqCst) {
            return Err(StorageError::Denied);
        }
        Ok(())
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check_access()?;
        let values = self
            .values
            .lock()
            .map_err(|_| StorageError::Backend("mutex poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.check_access()?;
        self.values
            .lock()
            .map_err(|_| StorageError::Backend("mutex poisoned".to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_none() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let store = MemoryPreferenceStore::new();
        store.set("accountId", "42").unwrap();
        assert_eq!(store.get("accountId").unwrap().as_deref(), Some("42"));
        assert_eq!(store.get_calls(), 1);
        assert_eq!(store.set_calls(), 1);
    }

    #[test]
    fn test_denied_access() {
        let store = MemoryPreferenceStore::with_value("accountId", "42");
        store.deny_access(true);
        assert_eq!(store.get("accountId"), Err(StorageError::Denied));
        assert_eq!(store.set("accountId", "1"), Err(StorageError::Denied));
        assert_eq!(store.peek("accountId").as_deref(), Some("42"));
    }
}
