use std::collections::HashSet;
use std::sync::Arc;

use leptos::prelude::*;

use crate::error::{ConfigError, InvalidSelection};
use crate::query::QuerySync;
use crate::store::{storage_key, SelectionStore};

/// Static metadata for one tab: the stable value, the visible label,
/// extra element attributes, and the "preselect me" flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabDescriptor {
    pub value: String,
    pub label: String,
    pub attributes: Vec<(String, String)>,
    pub is_default: bool,
}

impl TabDescriptor {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            attributes: Vec::new(),
            is_default: false,
        }
    }

    /// Mark this tab as the group default. At most one tab per group may
    /// carry the flag.
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }
}

/// How the selection is reflected into the query string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryParamMode {
    /// No query-string sync.
    #[default]
    Disabled,
    /// Sync under the group id as the parameter name. Requires a group id.
    Enabled,
    /// Sync under an explicitly chosen parameter name.
    Named(String),
}

/// Pane mounting strategy, consumed by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPolicy {
    /// All panes stay mounted; non-selected ones are hidden. Pane-internal
    /// state survives tab switches.
    #[default]
    Eager,
    /// Only the selected pane is mounted; switching discards the previous
    /// pane's transient state.
    Lazy,
}

#[derive(Debug, Clone, Default)]
pub struct TabGroupConfig {
    pub descriptors: Vec<TabDescriptor>,
    pub group_id: Option<String>,
    pub default_value: Option<String>,
    pub query_param: QueryParamMode,
}

/// Selection state machine for one mounted tab group.
///
/// Owns the in-memory selection exclusively; the query string and the
/// durable store are injected side channels it writes to best-effort but
/// whose lifecycle it does not manage (they outlive unmount and are shared
/// across groups with the same group id).
#[derive(Clone)]
pub struct TabGroupModel {
    descriptors: Vec<TabDescriptor>,
    selected: RwSignal<String>,
    query_param: Option<String>,
    storage_key: Option<String>,
    query: Arc<dyn QuerySync>,
    store: Arc<dyn SelectionStore>,
}

impl std::fmt::Debug for TabGroupModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabGroupModel")
            .field("descriptors", &self.descriptors)
            .field("selected", &self.selected)
            .field("query_param", &self.query_param)
            .field("storage_key", &self.storage_key)
            .finish_non_exhaustive()
    }
}

fn validate(descriptors: &[TabDescriptor]) -> Result<(), ConfigError> {
    if descriptors.is_empty() {
        return Err(ConfigError::EmptyTabs);
    }
    let mut seen = HashSet::new();
    for descriptor in descriptors {
        if !seen.insert(descriptor.value.as_str()) {
            return Err(ConfigError::DuplicateValue(descriptor.value.clone()));
        }
    }
    if descriptors.iter().filter(|d| d.is_default).count() > 1 {
        return Err(ConfigError::MultipleDefaults);
    }
    Ok(())
}

fn resolve_query_param(config: &TabGroupConfig) -> Result<Option<String>, ConfigError> {
    match &config.query_param {
        QueryParamMode::Disabled => Ok(None),
        QueryParamMode::Named(name) if !name.is_empty() => Ok(Some(name.clone())),
        // An empty explicit name behaves like `Enabled`: fall back to the
        // group id, and only fail when there is no group id either.
        QueryParamMode::Named(_) | QueryParamMode::Enabled => config
            .group_id
            .clone()
            .map(Some)
            .ok_or(ConfigError::UnresolvedQueryParam),
    }
}

/// Initial selection precedence: explicit default > query parameter >
/// stored value > `is_default` tab > first tab. A query or store value
/// naming a tab that no longer exists is stale, not an error, and falls
/// through; an explicit default naming a missing tab is a caller bug.
fn initial_selection(
    config: &TabGroupConfig,
    query_param: Option<&str>,
    slot: Option<&str>,
    query: &dyn QuerySync,
    store: &dyn SelectionStore,
) -> Result<String, ConfigError> {
    let known = |value: &str| config.descriptors.iter().any(|d| d.value == value);

    if let Some(requested) = &config.default_value {
        if !known(requested) {
            let available = config
                .descriptors
                .iter()
                .map(|d| d.value.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ConfigError::UnknownDefault {
                requested: requested.clone(),
                available,
            });
        }
        return Ok(requested.clone());
    }

    if let Some(param) = query_param {
        if let Some(value) = query.read(param) {
            if known(&value) {
                return Ok(value);
            }
        }
    }

    if let Some(key) = slot {
        if let Some(value) = store.get(key) {
            if known(&value) {
                return Ok(value);
            }
        }
    }

    if let Some(descriptor) = config.descriptors.iter().find(|d| d.is_default) {
        return Ok(descriptor.value.clone());
    }
    Ok(config.descriptors[0].value.clone())
}

impl TabGroupModel {
    /// Validates the configuration and resolves the initial selection.
    /// Fails only on structurally invalid configuration; once it returns
    /// `Ok` the selection is guaranteed to be one of the descriptor values.
    pub fn new(
        config: TabGroupConfig,
        query: Arc<dyn QuerySync>,
        store: Arc<dyn SelectionStore>,
    ) -> Result<Self, ConfigError> {
        validate(&config.descriptors)?;
        let query_param = resolve_query_param(&config)?;
        let slot = config.group_id.as_deref().map(storage_key);
        let initial = initial_selection(
            &config,
            query_param.as_deref(),
            slot.as_deref(),
            &*query,
            &*store,
        )?;

        Ok(Self {
            descriptors: config.descriptors,
            selected: RwSignal::new(initial),
            query_param,
            storage_key: slot,
            query,
            store,
        })
    }

    pub fn descriptors(&self) -> &[TabDescriptor] {
        &self.descriptors
    }

    /// Reactive read of the current selection.
    pub fn selected(&self) -> String {
        self.selected.get()
    }

    /// Reactive check against one tab value.
    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.with(|selected| selected == value)
    }

    /// Non-reactive read, for event handlers that must not subscribe.
    pub fn selected_untracked(&self) -> String {
        self.selected.get_untracked()
    }

    /// Switches the selection. The in-memory update is synchronous and
    /// visible to the view before the side-channel writes are issued;
    /// those writes are best-effort and their failure is logged and
    /// swallowed rather than rolled back.
    pub fn select(&self, value: &str) -> Result<(), InvalidSelection> {
        if !self.descriptors.iter().any(|d| d.value == value) {
            return Err(InvalidSelection {
                requested: value.to_string(),
            });
        }

        self.selected.set(value.to_string());

        if let Some(param) = &self.query_param {
            if let Err(err) = self.query.write(param, value) {
                log::warn!("tab group query sync failed for \"{value}\": {err}");
            }
        }
        if let Some(key) = &self.storage_key {
            if let Err(err) = self.store.set(key, value) {
                log::warn!("tab group persistence failed for \"{value}\": {err}");
            }
        }
        Ok(())
    }
}
