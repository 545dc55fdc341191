//! Platform interface for preference persistence.

use super::error::StorageResult;

/// Key-value store for small string preferences.
///
/// Implementations must return `Ok(None)` for a missing key and report blocked
/// access as [`StorageError::Denied`](super::StorageError::Denied), keeping it
/// distinct from every other failure.
pub trait PreferenceStore {
    /// Reads the value stored under `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}
