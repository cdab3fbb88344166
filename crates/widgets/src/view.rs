use std::sync::Arc;

use leptos::children::ViewFn;
use leptos::html;
use leptos::prelude::*;

use crate::model::{QueryParamMode, RenderPolicy, TabDescriptor, TabGroupConfig, TabGroupModel};
use crate::query::BrowserQuery;
use crate::store::LocalStorage;

/// One content pane, pre-rendered by the page layer and opaque to the
/// widget. `value` ties it to the matching descriptor.
#[derive(Clone)]
pub struct TabPane {
    pub value: String,
    pub content: ViewFn,
}

impl TabPane {
    pub fn new(value: impl Into<String>, content: impl Into<ViewFn>) -> Self {
        Self {
            value: value.into(),
            content: content.into(),
        }
    }
}

fn container_class(extra: Option<String>) -> String {
    match extra {
        Some(extra) if !extra.is_empty() => format!("tabgroup {extra}"),
        _ => "tabgroup".to_string(),
    }
}

fn next_tab_index(current: usize, count: usize) -> usize {
    (current + 1) % count
}

fn previous_tab_index(current: usize, count: usize) -> usize {
    (current + count - 1) % count
}

fn focus_tab(refs: &[NodeRef<html::Li>], index: usize) {
    if let Some(el) = refs.get(index).and_then(|node_ref| node_ref.get()) {
        let _ = el.focus();
    }
}

/// Select the tab unless it is already active. The optional hook runs
/// right before the panes swap (scroll-position preservation and the like).
fn activate(model: &TabGroupModel, value: &str, before_switch: Option<Callback<()>>) {
    if model.selected_untracked() == value {
        return;
    }
    if let Some(hook) = before_switch {
        hook.run(());
    }
    if let Err(err) = model.select(value) {
        log::warn!("tab activation rejected: {err}");
    }
}

/// Tab group: a row of mutually exclusive labeled tabs over exactly one
/// visible content pane, with optional query-string and localStorage
/// persistence of the selection.
#[component]
pub fn TabGroup(
    /// Tab metadata, in display order.
    descriptors: Vec<TabDescriptor>,
    /// Pre-rendered pane content, matched to descriptors by value.
    panes: Vec<TabPane>,
    /// Shared persistence id. Groups with the same id remember one
    /// selection together across pages and sessions.
    #[prop(optional, into)]
    group_id: Option<String>,
    /// Force the initial selection to this value (must exist).
    #[prop(optional, into)]
    default_value: Option<String>,
    /// Query-string sync mode.
    #[prop(optional)]
    query_param: QueryParamMode,
    /// Eager keeps all panes mounted; Lazy mounts only the selected one.
    #[prop(optional)]
    render_policy: RenderPolicy,
    /// Additional CSS classes for the container.
    #[prop(optional, into)]
    class: MaybeProp<String>,
    /// Called immediately before the selection changes.
    #[prop(optional)]
    on_before_switch: Option<Callback<()>>,
) -> impl IntoView {
    let model = TabGroupModel::new(
        TabGroupConfig {
            descriptors,
            group_id,
            default_value,
            query_param,
        },
        Arc::new(BrowserQuery),
        Arc::new(LocalStorage),
    );

    let model = match model {
        Ok(model) => model,
        Err(err) => {
            // Invalid configuration is a developer bug: render the
            // diagnostic in place of the widget instead of a blank spot.
            log::error!("tab group cannot mount: {err}");
            return view! {
                <div class="tabgroup tabgroup--error" role="alert">
                    {format!("Tab group configuration error: {err}")}
                </div>
            }
            .into_any();
        }
    };

    let tab_refs: Vec<NodeRef<html::Li>> = model
        .descriptors()
        .iter()
        .map(|_| NodeRef::new())
        .collect();

    let tabs = model
        .descriptors()
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, descriptor)| {
            let tab_ref = tab_refs[index];
            let value = descriptor.value.clone();

            // A "class" entry merges into the class list; everything else
            // goes onto the element after mount.
            let extra_class = descriptor
                .attributes
                .iter()
                .filter(|(name, _)| name == "class")
                .map(|(_, v)| v.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let base_class = if extra_class.is_empty() {
                "tabgroup__tab".to_string()
            } else {
                format!("tabgroup__tab {extra_class}")
            };

            let plain_attributes: Vec<(String, String)> = descriptor
                .attributes
                .iter()
                .filter(|(name, _)| name != "class")
                .cloned()
                .collect();
            Effect::new(move |_| {
                if let Some(el) = tab_ref.get() {
                    for (name, attr_value) in &plain_attributes {
                        let _ = el.set_attribute(name, attr_value);
                    }
                }
            });

            let tab_class = {
                let model = model.clone();
                let value = value.clone();
                move || {
                    if model.is_selected(&value) {
                        format!("{base_class} tabgroup__tab--active")
                    } else {
                        base_class.clone()
                    }
                }
            };
            let tab_index = {
                let model = model.clone();
                let value = value.clone();
                move || if model.is_selected(&value) { "0" } else { "-1" }
            };
            let aria_selected = {
                let model = model.clone();
                let value = value.clone();
                move || {
                    if model.is_selected(&value) {
                        "true"
                    } else {
                        "false"
                    }
                }
            };

            let handle_click = {
                let model = model.clone();
                let value = value.clone();
                move |_| activate(&model, &value, on_before_switch)
            };
            let handle_keydown = {
                let model = model.clone();
                let refs = tab_refs.clone();
                let value = value.clone();
                move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
                    "Enter" => activate(&model, &value, on_before_switch),
                    "ArrowRight" => focus_tab(&refs, next_tab_index(index, refs.len())),
                    "ArrowLeft" => focus_tab(&refs, previous_tab_index(index, refs.len())),
                    _ => {}
                }
            };

            view! {
                <li
                    node_ref=tab_ref
                    role="tab"
                    class=tab_class
                    tabindex=tab_index
                    aria-selected=aria_selected
                    on:click=handle_click
                    on:keydown=handle_keydown
                >
                    {descriptor.label.clone()}
                </li>
            }
        })
        .collect_view();

    let panes_view = match render_policy {
        RenderPolicy::Eager => {
            // Every pane stays mounted; only visibility toggles, so pane
            // state survives tab switches.
            let model = model.clone();
            panes
                .iter()
                .map(|pane| {
                    let model = model.clone();
                    let value = pane.value.clone();
                    view! {
                        <div
                            class="tabgroup__pane"
                            role="tabpanel"
                            hidden=move || !model.is_selected(&value)
                        >
                            {pane.content.run()}
                        </div>
                    }
                })
                .collect_view()
                .into_any()
        }
        RenderPolicy::Lazy => {
            let model = model.clone();
            (move || {
                let selected = model.selected();
                panes.iter().find(|pane| pane.value == selected).map(|pane| {
                    view! {
                        <div class="tabgroup__pane" role="tabpanel">
                            {pane.content.run()}
                        </div>
                    }
                })
            })
            .into_any()
        }
    };

    view! {
        <div class=move || container_class(class.get())>
            <ul class="tabgroup__list" role="tablist" aria-orientation="horizontal">
                {tabs}
            </ul>
            <div class="tabgroup__panes">{panes_view}</div>
        </div>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::error::SideChannelError;
    use crate::query::QuerySync;
    use crate::store::{storage_key, SelectionStore};

    struct RecordingQuery(Arc<Mutex<Vec<String>>>);

    impl QuerySync for RecordingQuery {
        fn read(&self, _param: &str) -> Option<String> {
            None
        }

        fn write(&self, param: &str, value: &str) -> Result<(), SideChannelError> {
            self.0.lock().unwrap().push(format!("query {param}={value}"));
            Ok(())
        }
    }

    struct RecordingStore(Arc<Mutex<Vec<String>>>);

    impl SelectionStore for RecordingStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, key: &str, value: &str) -> Result<(), SideChannelError> {
            self.0.lock().unwrap().push(format!("store {key}={value}"));
            Ok(())
        }
    }

    fn recording_model(writes: &Arc<Mutex<Vec<String>>>) -> TabGroupModel {
        TabGroupModel::new(
            TabGroupConfig {
                descriptors: vec![
                    TabDescriptor::new("a", "A").as_default(),
                    TabDescriptor::new("b", "B"),
                ],
                group_id: Some("g".to_string()),
                query_param: QueryParamMode::Named("current".to_string()),
                ..Default::default()
            },
            Arc::new(RecordingQuery(writes.clone())),
            Arc::new(RecordingStore(writes.clone())),
        )
        .unwrap()
    }

    #[test]
    fn test_activating_the_selected_tab_writes_nothing() {
        let owner = Owner::new();
        owner.set();
        let writes = Arc::new(Mutex::new(Vec::new()));
        let model = recording_model(&writes);
        let hook_calls = Arc::new(AtomicUsize::new(0));
        let hook = {
            let hook_calls = hook_calls.clone();
            Callback::new(move |_| {
                hook_calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        activate(&model, "a", Some(hook));

        assert_eq!(model.selected_untracked(), "a");
        assert!(writes.lock().unwrap().is_empty());
        assert_eq!(hook_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_activation_writes_query_before_store() {
        let owner = Owner::new();
        owner.set();
        let writes = Arc::new(Mutex::new(Vec::new()));
        let model = recording_model(&writes);

        activate(&model, "b", None);

        assert_eq!(model.selected_untracked(), "b");
        assert_eq!(
            *writes.lock().unwrap(),
            vec![
                "query current=b".to_string(),
                format!("store {}=b", storage_key("g")),
            ]
        );
    }

    #[test]
    fn test_hook_runs_on_a_real_switch() {
        let owner = Owner::new();
        owner.set();
        let writes = Arc::new(Mutex::new(Vec::new()));
        let model = recording_model(&writes);
        let hook_calls = Arc::new(AtomicUsize::new(0));
        let hook = {
            let hook_calls = hook_calls.clone();
            Callback::new(move |_| {
                hook_calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        activate(&model, "b", Some(hook));

        assert_eq!(model.selected_untracked(), "b");
        assert_eq!(hook_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_container_class_has_no_trailing_space() {
        assert_eq!(container_class(None), "tabgroup");
        assert_eq!(container_class(Some(String::new())), "tabgroup");
        assert_eq!(container_class(Some("wide".to_string())), "tabgroup wide");
    }

    #[test]
    fn test_arrow_right_wraps_past_last() {
        assert_eq!(next_tab_index(0, 3), 1);
        assert_eq!(next_tab_index(1, 3), 2);
        assert_eq!(next_tab_index(2, 3), 0);
    }

    #[test]
    fn test_arrow_left_wraps_past_first() {
        // focus on the first of three, ArrowLeft lands on the last
        assert_eq!(previous_tab_index(0, 3), 2);
        assert_eq!(previous_tab_index(2, 3), 1);
    }

    #[test]
    fn test_single_tab_wraps_to_itself() {
        assert_eq!(next_tab_index(0, 1), 0);
        assert_eq!(previous_tab_index(0, 1), 0);
    }
}
