use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::SideChannelError;

/// One query-string parameter on the current navigable location.
///
/// `write` must not trigger a page load; the address only changes so that
/// reload and link sharing land on the same tab.
pub trait QuerySync: Send + Sync {
    fn read(&self, param: &str) -> Option<String>;
    fn write(&self, param: &str, value: &str) -> Result<(), SideChannelError>;
}

/// Real location/history backed implementation. Parameters other than the
/// one being written are carried over untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserQuery;

fn current_params() -> HashMap<String, String> {
    let search = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default()
}

impl QuerySync for BrowserQuery {
    fn read(&self, param: &str) -> Option<String> {
        current_params().get(param).cloned()
    }

    fn write(&self, param: &str, value: &str) -> Result<(), SideChannelError> {
        let mut params = current_params();
        params.insert(param.to_string(), value.to_string());
        let query_string = serde_qs::to_string(&params)
            .map_err(|err| SideChannelError(format!("query encoding failed: {err}")))?;
        let new_url = format!("?{}", query_string);

        let current_search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        // Only touch history if the address actually changed
        if current_search == new_url {
            return Ok(());
        }

        let window = web_sys::window()
            .ok_or_else(|| SideChannelError("window is not available".to_string()))?;
        let history = window
            .history()
            .map_err(|err| SideChannelError(format!("history is not available: {err:?}")))?;
        history
            .replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&new_url))
            .map_err(|err| SideChannelError(format!("history update failed: {err:?}")))
    }
}

/// In-memory fake for tests: a plain parameter map with no location behind it.
#[derive(Debug, Default)]
pub struct MemoryQuery {
    params: Mutex<HashMap<String, String>>,
}

impl MemoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a parameter, as if the page had been opened with it.
    pub fn with_param(param: &str, value: &str) -> Self {
        let query = Self::default();
        let _ = query.write(param, value);
        query
    }
}

impl QuerySync for MemoryQuery {
    fn read(&self, param: &str) -> Option<String> {
        self.params.lock().ok()?.get(param).cloned()
    }

    fn write(&self, param: &str, value: &str) -> Result<(), SideChannelError> {
        let mut params = self
            .params
            .lock()
            .map_err(|_| SideChannelError("memory query poisoned".to_string()))?;
        params.insert(param.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_query_round_trip() {
        let query = MemoryQuery::new();
        assert_eq!(query.read("current-os"), None);
        query.write("current-os", "linux").unwrap();
        assert_eq!(query.read("current-os"), Some("linux".to_string()));
    }

    #[test]
    fn test_with_param_seeds_initial_value() {
        let query = MemoryQuery::with_param("lang", "rust");
        assert_eq!(query.read("lang"), Some("rust".to_string()));
        assert_eq!(query.read("other"), None);
    }
}
