use gloo_timers::callback::Interval;
use shared::{ApiBase, FetchError, POLL_INTERVAL, Sample};
use wasm_bindgen_futures::spawn_local;
use yew::Callback;

use crate::api;

pub enum PollEvent {
    Started,
    Finished(Result<Sample, FetchError>),
}

/// Polls `GET /sensor-data` once right away and then on every interval tick,
/// whether or not the previous request has come back. Dropping it stops the
/// timer.
pub struct SensorPoller {
    _interval: Interval,
}

impl SensorPoller {
    pub fn start(api: ApiBase, on_event: Callback<PollEvent>) -> Self {
        let tick = move || poll_once(api.clone(), on_event.clone());
        tick();
        let interval = Interval::new(POLL_INTERVAL.as_millis() as u32, tick);
        Self {
            _interval: interval,
        }
    }
}

fn poll_once(api: ApiBase, on_event: Callback<PollEvent>) {
    on_event.emit(PollEvent::Started);
    spawn_local(async move {
        let result = api::fetch_sample(&api).await;
        on_event.emit(PollEvent::Finished(result));
    });
}
