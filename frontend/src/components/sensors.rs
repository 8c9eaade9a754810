use shared::{ApiBase, ChartSeries, MonitorConfig, SensorMetric, SensorMonitor};
use yew::prelude::*;

use super::trend_chart::TrendChart;
use super::utils::render_error_message;
use crate::poller::{PollEvent, SensorPoller};

const CHART_METRICS: [SensorMetric; 2] = [SensorMetric::Temperature, SensorMetric::Humidity];

#[derive(Properties, PartialEq)]
pub struct SensorsProps {
    pub api: ApiBase,
}

pub enum Msg {
    Poll(PollEvent),
}

/// Live readings with a 50-sample temperature/humidity trend.
pub struct SensorsScreen {
    monitor: SensorMonitor,
    _poller: SensorPoller,
}

impl Component for SensorsScreen {
    type Message = Msg;
    type Properties = SensorsProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            monitor: SensorMonitor::new(MonitorConfig::app()),
            _poller: SensorPoller::start(ctx.props().api.clone(), ctx.link().callback(Msg::Poll)),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Poll(PollEvent::Started) => {
                self.monitor.begin_poll();
                false
            }
            Msg::Poll(PollEvent::Finished(result)) => {
                self.monitor.record(result);
                true
            }
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().api != old_props.api {
            log::info!("restarting sensor polling against {}", ctx.props().api);
            self.monitor.reset();
            self._poller = SensorPoller::start(ctx.props().api.clone(), ctx.link().callback(Msg::Poll));
        }
        true
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <div class="screen sensors">
                <h2 class="title">{"Live Sensors"}</h2>
                if self.monitor.is_loading() {
                    <div class="spinner"><i class="fa-solid fa-spinner fa-spin fa-2x"></i></div>
                }
                { render_error_message(self.monitor.error()) }
                { self.render_latest() }
            </div>
        }
    }
}

impl SensorsScreen {
    fn render_latest(&self) -> Html {
        let Some(last) = self.monitor.latest() else {
            return html! {};
        };
        let series = ChartSeries::from_samples(self.monitor.samples(), &CHART_METRICS);

        html! {
            <>
                <div class="stat-row">
                    { for [SensorMetric::Temperature, SensorMetric::Humidity, SensorMetric::SoilMoisture]
                        .into_iter()
                        .map(|metric| render_stat(metric, last.reading.get(metric))) }
                </div>
                <div class="card">
                    <p class="card-title">{"Temp / Humidity Trend"}</p>
                    <TrendChart series={series} />
                </div>
            </>
        }
    }
}

fn render_stat(metric: SensorMetric, value: Option<f64>) -> Html {
    html! {
        <div class={classes!("stat", metric.css_class())}>
            <span class="stat-title">{ metric.to_string() }</span>
            <span class="stat-value">
                { metric.format_value(value).unwrap_or_else(|| "--".to_string()) }
            </span>
        </div>
    }
}
