use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::SideChannelError;

const STORAGE_KEY_PREFIX: &str = "docsite.tab.";

/// Storage slot name for a tab group. Groups sharing an id share the slot,
/// which is what makes "remember my OS across pages" work.
pub fn storage_key(group_id: &str) -> String {
    format!("{STORAGE_KEY_PREFIX}{group_id}")
}

/// A single named slot in a durable per-origin store.
///
/// Injected into the model instead of reaching for the browser directly, so
/// selection behavior stays deterministic under test. `set` reports failure
/// but callers are expected to treat it as best-effort.
pub trait SelectionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SideChannelError>;
}

/// Browser localStorage. Absence of the window or of the storage object
/// (privacy mode, sandboxed frame) reads as "nothing stored".
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl SelectionStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        let storage = web_sys::window()?.local_storage().ok()??;
        storage.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SideChannelError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| SideChannelError("localStorage is not available".to_string()))?;
        storage
            .set_item(key, value)
            .map_err(|err| SideChannelError(format!("localStorage write failed: {err:?}")))
    }
}

/// In-memory store for tests and non-browser targets.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SideChannelError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| SideChannelError("memory store poisoned".to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_is_prefixed() {
        assert_eq!(storage_key("operating-system"), "docsite.tab.operating-system");
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("docsite.tab.os"), None);
        store.set("docsite.tab.os", "linux").unwrap();
        assert_eq!(store.get("docsite.tab.os"), Some("linux".to_string()));
        store.set("docsite.tab.os", "macos").unwrap();
        assert_eq!(store.get("docsite.tab.os"), Some("macos".to_string()));
    }
}
