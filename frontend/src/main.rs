mod api;
mod components;
mod config;
mod poller;

use components::dashboard::Dashboard;
use components::tabs::TabApp;
use yew::prelude::*;

/// Paths that serve the single-page web dashboard instead of the tab app.
const DASHBOARD_PATHS: [&str; 2] = ["/dashboard", "/dashboard.html"];

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default()
}

#[function_component(App)]
fn app() -> Html {
    let path = current_path();
    if DASHBOARD_PATHS.contains(&path.trim_end_matches('/')) {
        html! { <Dashboard api={config::api_base()} /> }
    } else {
        html! { <TabApp /> }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("SmartAg starting...");
    yew::Renderer::<App>::new().render();
}
