use bret_core::{SessionStore, TaskError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// The tab's `sessionStorage`, if the browser exposes one.
#[derive(Clone, Debug)]
pub struct BrowserSessionStore {
    storage: Option<Storage>,
}

impl BrowserSessionStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|window| window.session_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("sessionStorage is not available, rounds won't survive a reload");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, TaskError> {
        self.storage.as_ref().ok_or(TaskError::StorageUnavailable)
    }
}

impl Default for BrowserSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn unavailable(action: &str, err: JsValue) -> TaskError {
    log::error!("sessionStorage {} failed: {:?}", action, err);
    TaskError::StorageUnavailable
}

impl SessionStore for BrowserSessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, TaskError> {
        self.storage()?
            .get_item(key)
            .map_err(|err| unavailable("read", err))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), TaskError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| unavailable("write", err))
    }

    fn remove_item(&mut self, key: &str) -> Result<(), TaskError> {
        self.storage()?
            .remove_item(key)
            .map_err(|err| unavailable("remove", err))
    }
}
