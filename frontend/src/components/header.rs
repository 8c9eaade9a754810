use yew::prelude::*;

/// Renders a screen header
pub fn render_header(title: &str, subtitle: Option<&str>) -> Html {
    html! {
        <header class="app-header">
            <div class="brand-row">
                <span class="logo-dot"></span>
                <h1>{ title }</h1>
            </div>
            if let Some(subtitle) = subtitle {
                <p class="subtitle">{ subtitle }</p>
            }
        </header>
    }
}
