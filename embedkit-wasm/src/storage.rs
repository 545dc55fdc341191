use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

use embedkit_core::storage::{PreferenceStore, StorageError, StorageResult};

/// `DOMException.SECURITY_ERR`, thrown when third-party storage is blocked.
const SECURITY_ERR: u16 = 18;

/// Preference store backed by `window.localStorage`.
///
/// Browsers that block third-party storage throw a `SecurityError` on first
/// touch of `localStorage` inside a cross-origin frame; that is reported as
/// [`StorageError::Denied`].
pub struct LocalStorageStore;

impl PreferenceStore for LocalStorageStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        local_storage()?.get_item(key).map_err(classify)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        local_storage()?.set_item(key, value).map_err(classify)
    }
}

fn local_storage() -> StorageResult<Storage> {
    let window =
        web_sys::window().ok_or_else(|| StorageError::Backend("no window".to_string()))?;
    window
        .local_storage()
        .map_err(classify)?
        .ok_or_else(|| StorageError::Backend("localStorage unavailable".to_string()))
}

fn classify(err: JsValue) -> StorageError {
    match err.dyn_ref::<DomException>() {
        Some(exception) if exception.code() == SECURITY_ERR => StorageError::Denied,
        Some(exception) => StorageError::Backend(exception.message()),
        None => StorageError::Backend(format!("{err:?}")),
    }
}
