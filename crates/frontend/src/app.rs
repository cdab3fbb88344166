use leptos::prelude::*;
use widgets::{QueryParamMode, RenderPolicy, TabDescriptor, TabGroup, TabPane};

/// Sample documentation page. The prose and code blocks stand in for the
/// page-content pipeline; the tab groups are the real widget under test.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <main class="doc-page">
            <h1>"Getting started"</h1>
            <p>
                "Pick your operating system below. The choice is remembered "
                "across pages and reflected in the address bar, so reloading "
                "or sharing the link keeps the same tab open."
            </p>
            <InstallTabs />

            <h2>"First request"</h2>
            <p>"The same snippet in each supported client library:"</p>
            <ClientExampleTabs />
        </main>
    }
}

#[component]
fn InstallTabs() -> impl IntoView {
    let descriptors = vec![
        TabDescriptor::new("linux", "Linux").as_default(),
        TabDescriptor::new("macos", "macOS"),
        TabDescriptor::new("windows", "Windows").with_attribute("data-platform", "win32"),
    ];
    let panes = vec![
        TabPane::new("linux", || {
            view! { <pre><code>"curl -fsSL https://example.dev/install.sh | sh"</code></pre> }
        }),
        TabPane::new("macos", || {
            view! { <pre><code>"brew install example"</code></pre> }
        }),
        TabPane::new("windows", || {
            view! { <pre><code>"winget install example"</code></pre> }
        }),
    ];

    view! {
        <TabGroup
            descriptors=descriptors
            panes=panes
            group_id="operating-system".to_string()
            query_param=QueryParamMode::Enabled
        />
    }
}

#[component]
fn ClientExampleTabs() -> impl IntoView {
    let descriptors = vec![
        TabDescriptor::new("rust", "Rust"),
        TabDescriptor::new("python", "Python"),
    ];
    let panes = vec![
        TabPane::new("rust", || {
            view! { <pre><code>"let client = Client::new();\nclient.ping().await?;"</code></pre> }
        }),
        TabPane::new("python", || {
            view! { <pre><code>"client = Client()\nclient.ping()"</code></pre> }
        }),
    ];

    view! {
        <TabGroup
            descriptors=descriptors
            panes=panes
            render_policy=RenderPolicy::Lazy
        />
    }
}
