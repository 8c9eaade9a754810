use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{ApiBase, ClientError, Diagnosis, EncoderRegistry, PickedImage, Platform, ScanSession};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::results::{ResultLayout, render_diagnosis};
use super::utils::{
    check_file_size, chosen_file, open_file_dialog, read_picked_image, render_error_message,
};
use crate::api;

const FILE_INPUT_ID: &str = "scan-file-input";

#[derive(Properties, PartialEq)]
pub struct ScanProps {
    pub api: ApiBase,
}

pub enum Msg {
    FileChosen(GlooFile),
    Picked(u32, PickedImage, ObjectUrl),
    PickFailed(u32, String),
    Upload,
    Finished(Result<Diagnosis, ClientError>),
}

/// Leaf disease scan. Images go up as base64 JSON, the way a browser picker
/// without file access hands them over.
pub struct ScanScreen {
    session: ScanSession,
    preview_url: Option<ObjectUrl>,
    registry: EncoderRegistry,
    /// Bumped on every pick so a slow read cannot land after a newer one.
    pick_seq: u32,
}

impl Component for ScanScreen {
    type Message = Msg;
    type Properties = ScanProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            session: ScanSession::new(),
            preview_url: None,
            registry: EncoderRegistry::default(),
            pick_seq: 0,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileChosen(file) => {
                self.pick_seq = self.pick_seq.wrapping_add(1);
                self.session.clear_pick();
                self.preview_url = None;
                if let Err(e) = check_file_size(&file) {
                    self.session.reject(e.into());
                    return true;
                }

                let seq = self.pick_seq;
                let link = ctx.link().clone();
                spawn_local(async move {
                    let preview = ObjectUrl::from(file.clone());
                    match read_picked_image(file).await {
                        Ok(image) => link.send_message(Msg::Picked(seq, image, preview)),
                        Err(e) => link.send_message(Msg::PickFailed(seq, e)),
                    }
                });
                true
            }
            Msg::Picked(seq, _, _) | Msg::PickFailed(seq, _) if seq != self.pick_seq => false,
            Msg::Picked(_, image, preview) => {
                self.session.pick(image);
                self.preview_url = Some(preview);
                true
            }
            Msg::PickFailed(_, error) => {
                log::warn!("{}", error);
                self.session.clear_pick();
                self.session.reject(ClientError::Validation(
                    shared::ValidationError::MissingPayload,
                ));
                true
            }
            Msg::Upload => self.handle_upload(ctx),
            Msg::Finished(outcome) => {
                self.session.finish(outcome);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let on_change = link.batch_callback(|e: Event| chosen_file(&e).map(Msg::FileChosen));

        html! {
            <div class="screen scan">
                <h2 class="title">{"Leaf Disease Scan"}</h2>
                <div class="card">
                    <input
                        type="file"
                        id={FILE_INPUT_ID}
                        accept="image/*"
                        style="display: none;"
                        onchange={on_change}
                    />
                    <button
                        class="btn"
                        disabled={self.session.is_busy()}
                        onclick={Callback::from(|_: MouseEvent| open_file_dialog(FILE_INPUT_ID))}
                    >
                        { if self.session.picked().is_some() { "Choose another image" } else { "Pick an image" } }
                    </button>

                    if let Some(url) = &self.preview_url {
                        <img class="preview" src={url.to_string()} alt="Leaf preview" />
                    }

                    <button
                        class="btn btn-primary"
                        disabled={!self.session.can_upload()}
                        onclick={link.callback(|_| Msg::Upload)}
                    >
                        { if self.session.is_busy() { "Predicting..." } else { "Upload & Predict" } }
                    </button>

                    { render_error_message(self.session.error()) }

                    if let Some(diagnosis) = self.session.result() {
                        { render_diagnosis(diagnosis, ResultLayout::App) }
                    }

                    <p class="hint">
                        {"Tip: set the API base on the Home tab to your server's LAN address (e.g. http://192.168.x.x:5000). Images are sent as base64 JSON."}
                    </p>
                </div>
            </div>
        }
    }
}

impl ScanScreen {
    fn handle_upload(&mut self, ctx: &Context<Self>) -> bool {
        let registry = &self.registry;
        let Some(encoded) = self
            .session
            .begin_upload()
            .map(|image| registry.encode(Platform::BrowserPicker, image))
        else {
            return false;
        };

        let body = match encoded {
            Ok(body) => body,
            Err(e) => {
                self.session.finish(Err(e.into()));
                return true;
            }
        };

        let api = ctx.props().api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let outcome = api::submit_prediction(&api, body)
                .await
                .map_err(ClientError::from);
            link.send_message(Msg::Finished(outcome));
        });
        true
    }
}
