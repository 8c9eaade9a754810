use shared::Diagnosis;
use yew::prelude::*;

#[derive(Clone, Copy, PartialEq)]
pub enum ResultLayout {
    /// Scan tab: bold label, confidence with one decimal, guidance line.
    App,
    /// Dashboard alert: labelled rows, confidence with two decimals.
    Web,
}

pub fn render_diagnosis(diagnosis: &Diagnosis, layout: ResultLayout) -> Html {
    match layout {
        ResultLayout::App => html! {
            <div class="results-container">
                <p class="pred">{ &diagnosis.label }</p>
                if let Some(confidence) = diagnosis.confidence_text(1) {
                    <p class="meta">{ format!("Confidence: {}", confidence) }</p>
                }
                if let Some(guidance) = &diagnosis.guidance {
                    <p class="meta">{ guidance }</p>
                }
            </div>
        },
        ResultLayout::Web => html! {
            <div class="alert alert-success">
                <strong>{"Prediction:"}</strong>{" "}{ &diagnosis.label }<br/>
                <strong>{"Confidence:"}</strong>{" "}
                { diagnosis.confidence_text(2).unwrap_or_else(|| "--".to_string()) }<br/>
                <strong>{"Treatment:"}</strong>{" "}
                { diagnosis.guidance.clone().unwrap_or_default() }
            </div>
        },
    }
}
