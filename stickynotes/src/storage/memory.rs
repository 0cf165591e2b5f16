//! In-memory key/value store
//!
//! Backs tests and ephemeral sessions. Clones share the same map, so a test
//! can hand one clone to a [`super::PersistenceGateway`] and inspect the
//! stored value or the number of writes through another. Failures can be
//! injected through [`MemoryStoreConfig`].

use super::KeyValueStore;
use crate::error::{NotesError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Options for simulating storage failures
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreConfig {
    /// Fail every read
    pub fail_get: bool,

    /// Fail every write
    pub fail_set: bool,
}

/// Map-backed [`KeyValueStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    items: Arc<RwLock<HashMap<String, String>>>,
    config: Arc<RwLock<MemoryStoreConfig>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryKeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with failure injection
    pub fn new_with_config(config: MemoryStoreConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            ..Self::default()
        }
    }

    /// Change failure injection mid-test
    pub fn set_config(&self, config: MemoryStoreConfig) {
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = config;
    }

    /// Number of successful `set_item` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn config(&self) -> MemoryStoreConfig {
        self.config.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        if self.config().fail_get {
            return Err(NotesError::Storage("Simulated read failure".into()));
        }
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if self.config().fail_set {
            return Err(NotesError::Storage("Simulated write failure".into()));
        }
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        items.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let store = MemoryKeyValueStore::new();
        let other = store.clone();

        store.set_item("notes", "[]").unwrap();
        assert_eq!(other.get_item("notes").unwrap().as_deref(), Some("[]"));
        assert_eq!(other.write_count(), 1);
    }

    #[test]
    fn test_failure_injection_can_be_toggled() {
        let store = MemoryKeyValueStore::new();
        store.set_config(MemoryStoreConfig {
            fail_set: true,
            ..Default::default()
        });
        assert!(store.set_item("notes", "[]").is_err());
        assert_eq!(store.write_count(), 0);

        store.set_config(MemoryStoreConfig::default());
        store.set_item("notes", "[]").unwrap();
        assert_eq!(store.write_count(), 1);
    }
}
