use shared::ChartSeries;
use shared::chart::svg_points;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TrendChartProps {
    pub series: ChartSeries,
    #[prop_or(320.0)]
    pub width: f64,
    #[prop_or(200.0)]
    pub height: f64,
}

/// Line chart drawn into its own SVG. New `series` props are the only way to
/// update it.
#[function_component(TrendChart)]
pub fn trend_chart(props: &TrendChartProps) -> Html {
    let series = &props.series;
    let lines = series.plot(props.width, props.height);
    let first_label = series.labels.first().cloned().unwrap_or_default();
    let last_label = series.labels.last().cloned().unwrap_or_default();

    html! {
        <div class="trend-chart">
            <svg
                viewBox={format!("0 0 {} {}", props.width, props.height)}
                preserveAspectRatio="none"
                class="trend-chart-canvas"
            >
                { for lines.iter().map(|(metric, coords)| {
                    let points = svg_points(coords);
                    html! {
                        <polyline
                            key={metric.to_string()}
                            class={classes!("series", metric.css_class())}
                            fill="none"
                            points={points}
                        />
                    }
                })}
            </svg>
            <div class="chart-axis">
                <span>{ first_label }</span>
                <span class="chart-max">{ axis_range(series) }</span>
                <span>{ last_label }</span>
            </div>
            <ul class="chart-legend">
                { for series.datasets.iter().map(|dataset| html! {
                    <li class={dataset.metric.css_class()}>{ dataset.metric.to_string() }</li>
                })}
            </ul>
        </div>
    }
}

fn axis_range(series: &ChartSeries) -> String {
    let (min, max) = series.y_range();
    if min < 0.0 {
        format!("{:.1} to {:.1}", min, max)
    } else {
        format!("max {:.1}", max)
    }
}
