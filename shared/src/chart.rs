use crate::sensor::{Sample, SensorMetric};

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub metric: SensorMetric,
    /// `None` where the reading was missing; gaps are spanned when drawn.
    pub points: Vec<Option<f64>>,
}

/// Parallel label/value sequences in the shape a line chart consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartSeries {
    /// Projects samples, oldest first, onto one dataset per metric. Nothing is
    /// filtered, interpolated or resampled.
    pub fn from_samples<'a, I>(samples: I, metrics: &[SensorMetric]) -> Self
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        let mut labels = Vec::new();
        let mut datasets: Vec<Dataset> = metrics
            .iter()
            .map(|&metric| Dataset {
                metric,
                points: Vec::new(),
            })
            .collect();

        for sample in samples {
            labels.push(sample.time_label());
            for dataset in &mut datasets {
                dataset.points.push(sample.reading.get(dataset.metric));
            }
        }

        Self { labels, datasets }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Bounds of the y axis as `(min, max)`. Zero is always on the axis and
    /// negative readings extend it downwards.
    pub fn y_range(&self) -> (f64, f64) {
        let (min, max) = self
            .datasets
            .iter()
            .flat_map(|d| d.points.iter().flatten())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if max > min { (min, max) } else { (min, min + 1.0) }
    }

    /// Screen coordinates for each dataset inside a `width` x `height` box,
    /// origin top-left. Missing points are dropped so the line spans the gap.
    pub fn plot(&self, width: f64, height: f64) -> Vec<(SensorMetric, Vec<(f64, f64)>)> {
        let (y_min, y_max) = self.y_range();
        let span = y_max - y_min;
        let step = if self.len() > 1 {
            width / (self.len() - 1) as f64
        } else {
            0.0
        };

        self.datasets
            .iter()
            .map(|dataset| {
                let coords = dataset
                    .points
                    .iter()
                    .enumerate()
                    .filter_map(|(i, point)| {
                        let value = (*point)?;
                        let x = i as f64 * step;
                        let y = height - ((value - y_min) / span) * height;
                        Some((x, y))
                    })
                    .collect();
                (dataset.metric, coords)
            })
            .collect()
    }
}

/// `points` attribute of an SVG polyline.
pub fn svg_points(coords: &[(f64, f64)]) -> String {
    coords
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}
