//! Preference store persisted as a JSON object on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use embedkit_core::storage::{PreferenceStore, StorageError, StorageResult};

/// Stores preferences in a single JSON file.
///
/// A permission error on the file is the desktop analogue of a browser
/// blocking third-party storage and is reported as [`StorageError::Denied`].
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<BTreeMap<String, String>> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                StorageError::Backend(format!("invalid preferences file: {e}"))
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(map_io_error(&err)),
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        let bytes = serde_json::to_vec_pretty(&values)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| map_io_error(&e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|e| map_io_error(&e))?;
        fs::rename(&tmp, &self.path).map_err(|e| map_io_error(&e))
    }
}

fn map_io_error(err: &std::io::Error) -> StorageError {
    if err.kind() == ErrorKind::PermissionDenied {
        StorageError::Denied
    } else {
        StorageError::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.get("accountId").unwrap(), None);
    }

    #[test]
    fn test_values_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        FilePreferenceStore::new(&path).set("accountId", "acc-1").unwrap();
        FilePreferenceStore::new(&path).set("other", "x").unwrap();

        let store = FilePreferenceStore::new(&path);
        assert_eq!(store.get("accountId").unwrap().as_deref(), Some("acc-1"));
        assert_eq!(store.get("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_corrupt_file_is_a_backend_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, b"not json").unwrap();

        let err = FilePreferenceStore::new(&path).get("accountId").unwrap_err();
        assert!(matches!(err, StorageError::Backend(_)));
    }

    #[test]
    fn test_permission_denied_maps_to_denied() {
        let err = std::io::Error::from(ErrorKind::PermissionDenied);
        assert_eq!(map_io_error(&err), StorageError::Denied);
        let err = std::io::Error::from(ErrorKind::Other);
        assert!(matches!(map_io_error(&err), StorageError::Backend(_)));
    }
}
