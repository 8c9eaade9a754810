use crate::buffer::RollingBuffer;
use crate::error::FetchError;
use crate::sensor::Sample;

/// What a failed poll does to the visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Keep the error text until the next successful poll.
    Surface,
    /// Log only; the last good values stay on screen.
    Silent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub capacity: usize,
    pub failure_policy: FailurePolicy,
}

impl MonitorConfig {
    /// Sensors tab of the app.
    pub fn app() -> Self {
        Self {
            capacity: crate::APP_WINDOW,
            failure_policy: FailurePolicy::Surface,
        }
    }

    /// Web dashboard page.
    pub fn web() -> Self {
        Self {
            capacity: crate::WEB_WINDOW,
            failure_policy: FailurePolicy::Silent,
        }
    }
}

/// Rolling window of sensor samples plus the transient poll status.
///
/// Results are applied in the order they complete; overlapping polls are
/// tolerated and never grow the window past its capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorMonitor {
    samples: RollingBuffer<Sample>,
    policy: FailurePolicy,
    error: Option<String>,
    loading: bool,
    in_flight: usize,
}

impl SensorMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            samples: RollingBuffer::new(config.capacity),
            policy: config.failure_policy,
            error: None,
            loading: true,
            in_flight: 0,
        }
    }

    /// Marks a poll as started. Returns how many were already outstanding.
    pub fn begin_poll(&mut self) -> usize {
        let outstanding = self.in_flight;
        if outstanding > 0 {
            log::warn!("sensor poll started with {} request(s) still in flight", outstanding);
        }
        self.in_flight += 1;
        outstanding
    }

    pub fn record_success(&mut self, sample: Sample) {
        self.finish_poll();
        self.samples.push(sample);
        self.error = None;
    }

    pub fn record_failure(&mut self, err: &FetchError) {
        self.finish_poll();
        log::warn!("sensor poll failed: {}", err);
        if self.policy == FailurePolicy::Surface {
            self.error = Some(err.to_string());
        }
    }

    pub fn record(&mut self, result: Result<Sample, FetchError>) {
        match result {
            Ok(sample) => self.record_success(sample),
            Err(err) => self.record_failure(&err),
        }
    }

    /// Drops the window and starts over, e.g. after the API base changed.
    /// Polls still in flight are forgotten; their results land in the new window.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.error = None;
        self.loading = true;
        self.in_flight = 0;
    }

    fn finish_poll(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = false;
    }

    pub fn samples(&self) -> &RollingBuffer<Sample> {
        &self.samples
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.latest()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True until the first poll has completed either way.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::SensorReading;
    use chrono::{TimeZone, Utc};

    fn sample(temp: f64) -> Sample {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
            + chrono::Duration::seconds(temp as i64);
        Sample::new(
            SensorReading {
                temperature: Some(temp),
                humidity: Some(50.0),
                soil_moisture: Some(300.0),
            },
            at,
        )
    }

    fn temps(monitor: &SensorMonitor) -> Vec<f64> {
        monitor
            .samples()
            .iter()
            .filter_map(|s| s.reading.temperature)
            .collect()
    }

    #[test]
    fn starts_loading_until_first_result() {
        let mut monitor = SensorMonitor::new(MonitorConfig::app());
        assert!(monitor.is_loading());
        monitor.begin_poll();
        monitor.record_failure(&FetchError::Network("offline".into()));
        assert!(!monitor.is_loading());
    }

    #[test]
    fn window_holds_most_recent_samples_in_order() {
        let mut monitor = SensorMonitor::new(MonitorConfig {
            capacity: 3,
            failure_policy: FailurePolicy::Surface,
        });
        for t in 1..=5 {
            monitor.begin_poll();
            monitor.record_success(sample(t as f64));
        }
        assert_eq!(temps(&monitor), vec![3.0, 4.0, 5.0]);
        assert_eq!(monitor.latest().and_then(|s| s.reading.temperature), Some(5.0));
    }

    #[test]
    fn failure_keeps_buffer_and_polling_resumes() {
        let mut monitor = SensorMonitor::new(MonitorConfig::app());
        monitor.begin_poll();
        monitor.record_success(sample(1.0));
        let before = monitor.samples().clone();

        monitor.begin_poll();
        monitor.record_failure(&FetchError::Timeout(5));
        assert_eq!(monitor.samples(), &before);
        assert_eq!(monitor.error(), Some("Request timed out after 5 s"));

        monitor.begin_poll();
        monitor.record_success(sample(2.0));
        assert_eq!(temps(&monitor), vec![1.0, 2.0]);
        assert_eq!(monitor.error(), None);
    }

    #[test]
    fn reset_starts_a_fresh_window() {
        let mut monitor = SensorMonitor::new(MonitorConfig::app());
        monitor.begin_poll();
        monitor.record_success(sample(1.0));
        monitor.begin_poll();
        monitor.record_failure(&FetchError::NotJson);

        monitor.reset();
        assert!(monitor.samples().is_empty());
        assert_eq!(monitor.samples().capacity(), 50);
        assert_eq!(monitor.error(), None);
        assert!(monitor.is_loading());
        assert_eq!(monitor.in_flight(), 0);
    }

    #[test]
    fn silent_policy_hides_errors() {
        let mut monitor = SensorMonitor::new(MonitorConfig::web());
        monitor.begin_poll();
        monitor.record(Err(FetchError::NotJson));
        assert_eq!(monitor.error(), None);
        assert!(monitor.samples().is_empty());
    }

    #[test]
    fn overlapping_polls_apply_in_completion_order() {
        let mut monitor = SensorMonitor::new(MonitorConfig {
            capacity: 2,
            failure_policy: FailurePolicy::Surface,
        });

        // three ticks fire before any response comes back
        assert_eq!(monitor.begin_poll(), 0);
        assert_eq!(monitor.begin_poll(), 1);
        assert_eq!(monitor.begin_poll(), 2);

        // the slow first request finishes last
        monitor.record_success(sample(20.0));
        monitor.record_success(sample(30.0));
        monitor.record_success(sample(10.0));

        assert_eq!(monitor.in_flight(), 0);
        assert_eq!(monitor.samples().len(), 2);
        assert_eq!(temps(&monitor), vec![30.0, 10.0]);
    }

    #[test]
    fn web_and_app_windows_differ() {
        assert_eq!(MonitorConfig::app().capacity, 50);
        assert_eq!(MonitorConfig::web().capacity, 20);
    }
}
