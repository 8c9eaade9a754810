use shared::ApiBase;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::header::render_header;
use super::tabs::Tab;
use crate::config;

#[derive(Properties, PartialEq)]
pub struct HomeProps {
    pub api: ApiBase,
    pub on_navigate: Callback<Tab>,
    pub on_api_change: Callback<ApiBase>,
}

#[function_component(Home)]
pub fn home(props: &HomeProps) -> Html {
    let draft = use_state(|| props.api.as_str().to_string());
    let save_error = use_state(|| None::<String>);

    let on_input = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            draft.set(input.value());
        })
    };

    let on_save = {
        let draft = draft.clone();
        let save_error = save_error.clone();
        let on_api_change = props.on_api_change.clone();
        Callback::from(move |_: MouseEvent| match config::save_api_base(&draft) {
            Ok(api) => {
                save_error.set(None);
                on_api_change.emit(api);
            }
            Err(e) => save_error.set(Some(format!("Could not save API base: {}", e))),
        })
    };

    let go = |tab: Tab| {
        let on_navigate = props.on_navigate.clone();
        Callback::from(move |_: MouseEvent| on_navigate.emit(tab))
    };

    html! {
        <div class="screen home">
            { render_header("SmartAgri", Some("IoT + AI Crop Assistant")) }

            <div class="actions-row">
                <button class="action-card" aria-label="Go to Live Sensors" onclick={go(Tab::Sensors)}>
                    <span class="action-title">{"Live Sensors"}</span>
                    <span class="action-sub">{"Temperature • Humidity • Soil"}</span>
                </button>
                <button class="action-card" aria-label="Go to Leaf Scan" onclick={go(Tab::Scan)}>
                    <span class="action-title">{"Leaf Scan"}</span>
                    <span class="action-sub">{"AI disease prediction"}</span>
                </button>
            </div>

            <div class="card">
                <p class="card-label">{"API Base"}</p>
                <p class="card-val">{ props.api.to_string() }</p>
                <div class="status-row">
                    <span class="badge-ok"></span>
                    <span class="status-text">{"Ready"}</span>
                </div>
                <div class="api-edit">
                    <input
                        type="url"
                        placeholder="http://192.168.x.x:5000 (empty = same origin)"
                        value={(*draft).clone()}
                        oninput={on_input}
                    />
                    <button class="btn" onclick={on_save}>{"Save"}</button>
                </div>
                if let Some(error) = &*save_error {
                    <p class="err">{ error }</p>
                }
                <p class="hint">
                    {"Open tabs below: "}<b>{"Sensors"}</b>{" / "}<b>{"Scan"}</b>
                </p>
            </div>

            <div class="features-row">
                { feature("Env Sensors", "Real-time field data") }
                { feature("AI Diagnosis", "Leaf disease insights") }
                { feature("Smart Tips", "Actionable guidance") }
            </div>
        </div>
    }
}

fn feature(title: &str, sub: &str) -> Html {
    html! {
        <div class="feature">
            <span class="feature-title">{ title }</span>
            <span class="feature-sub">{ sub }</span>
        </div>
    }
}
