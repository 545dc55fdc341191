//! Degraded-storage aware access to a [`PreferenceStore`].

use std::cell::Cell;
use std::rc::Rc;

use super::{PreferenceStore, StorageError, StorageResult};

/// Outcome of a preference read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preference {
    /// A value is stored under the key.
    Value(String),
    /// Nothing is stored under the key.
    Missing,
    /// Storage is degraded; the backend was not consulted or refused access.
    Degraded,
}

impl Preference {
    /// Returns the stored value, if any.
    #[must_use]
    pub fn into_value(self) -> Option<String> {
        match self {
            Self::Value(value) => Some(value),
            Self::Missing | Self::Degraded => None,
        }
    }
}

/// Outcome of a preference write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persisted {
    /// The backend accepted the value.
    Stored,
    /// Storage is degraded; the value lives in memory only.
    Degraded,
}

/// Wrapper that converts denied storage access into a terminal degraded mode.
///
/// Once access has been denied the backend is never touched again. Failures
/// other than [`StorageError::Denied`] are passed through to the caller.
pub struct Preferences {
    store: Rc<dyn PreferenceStore>,
    degraded: Cell<bool>,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences")
            .field("degraded", &self.degraded.get())
            .finish_non_exhaustive()
    }
}

impl Preferences {
    /// Wraps `store`.
    #[must_use]
    pub fn new(store: Rc<dyn PreferenceStore>) -> Self {
        Self {
            store,
            degraded: Cell::new(false),
        }
    }

    /// Whether access has been denied during this session.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.get()
    }

    /// Reads `key`.
    ///
    /// # Errors
    ///
    /// Returns backend failures other than denied access.
    pub fn get(&self, key: &str) -> StorageResult<Preference> {
        if self.is_degraded() {
            return Ok(Preference::Degraded);
        }
        match self.store.get(key) {
            Ok(Some(value)) => Ok(Preference::Value(value)),
            Ok(None) => Ok(Preference::Missing),
            Err(StorageError::Denied) => {
                self.degrade(key);
                Ok(Preference::Degraded)
            }
            Err(err) => Err(err),
        }
    }

    /// Writes `value` under `key`, best effort.
    ///
    /// # Errors
    ///
    /// Returns backend failures other than denied access.
    pub fn set(&self, key: &str, value: &str) -> StorageResult<Persisted> {
        if self.is_degraded() {
            return Ok(Persisted::Degraded);
        }
        match self.store.set(key, value) {
            Ok(()) => Ok(Persisted::Stored),
            Err(StorageError::Denied) => {
                self.degrade(key);
                Ok(Persisted::Degraded)
            }
            Err(err) => Err(err),
        }
    }

    fn degrade(&self, key: &str) {
        if !self.degraded.replace(true) {
            log::warn!("preference storage denied while accessing {key}; keeping selection in memory");
        }
    }
}
