use crate::error::StorageError;
use wasm_bindgen::JsValue;
use web_sys::{js_sys, window, Storage};

/// Synchronous string-keyed storage that outlives the page.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// The origin's `window.localStorage`.
///
/// Lookup happens once. Browsers with storage disabled (or privacy modes
/// that throw on access) leave `inner` empty and every write reports
/// `StorageError::Unavailable`.
pub struct LocalStorage {
    inner: Option<Storage>,
}

impl LocalStorage {
    pub fn new() -> Self {
        let inner = window().and_then(|w| w.local_storage().ok()).flatten();
        if inner.is_none() {
            log::warn!("localStorage is not available, cookie preferences won't survive a reload");
        }
        Self { inner }
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.inner.as_ref().ok_or(StorageError::Unavailable)?;
        storage.set_item(key, value).map_err(classify_js_error)
    }
}

fn classify_js_error(err: JsValue) -> StorageError {
    let name = js_sys::Reflect::get(&err, &JsValue::from_str("name"))
        .ok()
        .and_then(|n| n.as_string())
        .unwrap_or_default();
    let message = js_sys::Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", err));

    if name == "QuotaExceededError" || name == "NS_ERROR_DOM_QUOTA_REACHED" {
        StorageError::QuotaExceeded(message)
    } else {
        StorageError::Js(message)
    }
}
