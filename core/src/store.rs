use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::cell::RefCell;

use crate::*;

/// Named slot in a [`SessionStore`].
pub trait StorageKey {
    const KEY: &'static str;
}

/// Session-scoped key-value storage provided by the host.
pub trait SessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// In-memory store. Clones share the same entries, the way every page load of a browser tab sees the same session
/// storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Stand-in for hosts without session storage.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoStore;

impl SessionStore for NoStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>> {
        Err(TaskError::StorageUnavailable)
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(TaskError::StorageUnavailable)
    }

    fn remove_item(&mut self, _key: &str) -> Result<()> {
        Err(TaskError::StorageUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_clones_share_entries() {
        let mut store = MemoryStore::new();
        let other = store.clone();

        store.set_item("k", "v").unwrap();

        assert_eq!(other.get_item("k"), Ok(Some("v".to_string())));

        store.remove_item("k").unwrap();

        assert!(other.is_empty());
    }

    #[test]
    fn no_store_is_unavailable() {
        let mut store = NoStore;

        assert_eq!(store.get_item("k"), Err(TaskError::StorageUnavailable));
        assert_eq!(store.set_item("k", "v"), Err(TaskError::StorageUnavailable));
    }
}
