use gloo_file::File as GlooFile;
use shared::upload::validate_web_upload;
use shared::{
    ApiBase, ChartSeries, ClientError, Diagnosis, EncoderRegistry, MonitorConfig, PickedImage,
    Platform, ScanSession, SensorMetric, SensorMonitor,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::header::render_header;
use super::results::{ResultLayout, render_diagnosis};
use super::trend_chart::TrendChart;
use super::utils::{check_file_metadata, chosen_file, read_picked_image};
use crate::api;
use crate::poller::{PollEvent, SensorPoller};

const METRICS: [SensorMetric; 3] = [
    SensorMetric::Temperature,
    SensorMetric::Humidity,
    SensorMetric::SoilMoisture,
];

#[derive(Properties, PartialEq)]
pub struct DashboardProps {
    pub api: ApiBase,
}

pub enum Msg {
    Poll(PollEvent),
    FileChosen(Option<GlooFile>),
    Picked(u32, PickedImage),
    PickFailed(u32, String),
    Submit,
    Finished(Result<Diagnosis, ClientError>),
}

/// Single-page web dashboard: value cards, a 20-sample chart of all three
/// readings, and the multipart prediction form.
pub struct Dashboard {
    monitor: SensorMonitor,
    _poller: SensorPoller,
    session: ScanSession,
    registry: EncoderRegistry,
    reading_file: bool,
    pick_seq: u32,
}

impl Component for Dashboard {
    type Message = Msg;
    type Properties = DashboardProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            monitor: SensorMonitor::new(MonitorConfig::web()),
            _poller: SensorPoller::start(ctx.props().api.clone(), ctx.link().callback(Msg::Poll)),
            session: ScanSession::with_failure_prefix("Upload failed: "),
            registry: EncoderRegistry::default(),
            reading_file: false,
            pick_seq: 0,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Poll(PollEvent::Started) => {
                self.monitor.begin_poll();
                false
            }
            Msg::Poll(PollEvent::Finished(result)) => {
                self.monitor.record(result);
                true
            }
            Msg::FileChosen(chosen) => {
                // the pick always mirrors what the input shows
                self.pick_seq = self.pick_seq.wrapping_add(1);
                self.session.clear_pick();
                self.reading_file = false;
                let Some(file) = chosen else {
                    return true;
                };
                if let Err(e) = check_file_metadata(&file) {
                    self.session.reject(e.into());
                    return true;
                }

                self.reading_file = true;
                let seq = self.pick_seq;
                let link = ctx.link().clone();
                spawn_local(async move {
                    match read_picked_image(file).await {
                        Ok(image) => link.send_message(Msg::Picked(seq, image)),
                        Err(e) => link.send_message(Msg::PickFailed(seq, e)),
                    }
                });
                true
            }
            Msg::Picked(seq, _) | Msg::PickFailed(seq, _) if seq != self.pick_seq => false,
            Msg::Picked(_, image) => {
                self.reading_file = false;
                self.session.pick(image);
                true
            }
            Msg::PickFailed(_, error) => {
                log::warn!("{}", error);
                self.reading_file = false;
                self.session.clear_pick();
                true
            }
            Msg::Submit => self.handle_submit(ctx),
            Msg::Finished(outcome) => {
                self.session.finish(outcome);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let on_submit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });
        let on_change = link.callback(|e: Event| Msg::FileChosen(chosen_file(&e)));
        let series = ChartSeries::from_samples(self.monitor.samples(), &METRICS);
        let latest = self.monitor.latest().map(|s| s.reading).unwrap_or_default();

        html! {
            <div class="container dashboard">
                { render_header("SmartAg Dashboard", Some("Live field conditions and leaf diagnosis")) }

                <main class="main-content">
                    <section class="stat-row">
                        { for METRICS.into_iter().map(|metric| html! {
                            <div class={classes!("stat", metric.css_class())}>
                                <span class="stat-title">{ metric.to_string() }</span>
                                <span class="stat-value" id={metric.css_class()}>
                                    { metric.format_with_unit(latest.get(metric)).unwrap_or_else(|| "--".to_string()) }
                                </span>
                            </div>
                        })}
                    </section>

                    <section class="card">
                        <TrendChart series={series} width={640.0} height={240.0} />
                    </section>

                    <section class="card">
                        <form id="predictForm" onsubmit={on_submit}>
                            <input
                                type="file"
                                id="leafFile"
                                accept="image/jpeg,image/png"
                                disabled={self.session.is_busy()}
                                onchange={on_change}
                            />
                            <button
                                type="submit"
                                class="btn btn-primary"
                                disabled={self.session.is_busy() || self.reading_file}
                            >
                                { if self.session.is_busy() { "Uploading & predicting…" } else { "Predict" } }
                            </button>
                        </form>
                        { self.render_result() }
                    </section>
                </main>
            </div>
        }
    }
}

impl Dashboard {
    fn handle_submit(&mut self, ctx: &Context<Self>) -> bool {
        if self.session.is_busy() {
            return false;
        }
        let checked = validate_web_upload(self.session.picked()).map(|_| ());
        if let Err(e) = checked {
            self.session.reject(e.into());
            return true;
        }

        let registry = &self.registry;
        let Some(encoded) = self
            .session
            .begin_upload()
            .map(|image| registry.encode(Platform::BrowserFileInput, image))
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

    fn render_result(&self) -> Html {
        if let Some(diagnosis) = self.session.result() {
            render_diagnosis(diagnosis, ResultLayout::Web)
        } else if let Some(error) = self.session.error() {
            html! { <div id="predictResult" class="alert alert-danger">{ error }</div> }
        } else {
            html! {}
        }
    }
}
