//! Domain logic shared by the SmartAg web front ends and the host server.
//!
//! Nothing in this crate touches the network or the DOM; transports live in
//! the `frontend` and `backend` crates and feed results back in here.

pub mod buffer;
pub mod chart;
pub mod error;
pub mod http;
pub mod monitor;
pub mod prediction;
pub mod scan;
pub mod sensor;
pub mod upload;

use std::time::Duration;

pub use buffer::RollingBuffer;
pub use chart::{ChartSeries, Dataset};
pub use error::{ClientError, FetchError, ValidationError};
pub use http::ApiBase;
pub use monitor::{FailurePolicy, MonitorConfig, SensorMonitor};
pub use prediction::{Diagnosis, PredictionResponse, diagnosis_from_response};
pub use scan::ScanSession;
pub use sensor::{Sample, SensorMetric, SensorReading};
pub use upload::{
    Base64Body, Capability, EncoderRegistry, FilePart, ImageContent, PickedImage, Platform,
    UploadBody, UploadEncoder,
};

pub const SENSOR_DATA_PATH: &str = "/sensor-data";
pub const PREDICT_PATH: &str = "/predict-disease";

/// Delay between two sensor polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const POLL_TIMEOUT: Duration = Duration::from_secs(5);
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(20);

/// Samples kept by the app's Sensors screen.
pub const APP_WINDOW: usize = 50;
/// Samples kept by the web dashboard.
pub const WEB_WINDOW: usize = 20;

/// Largest image accepted for upload, in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
