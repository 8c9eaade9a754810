use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumIter};

use crate::error::FetchError;
use crate::http::interpret_response;

/// Current-instant reading as published by `GET /sensor-data`.
///
/// Each field is `None` when the endpoint sent something that is not a number
/// (the host publishes `null` until the first reading arrives).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub soil_moisture: Option<f64>,
}

impl SensorReading {
    /// Parses the endpoint body. Anything but a JSON object is malformed;
    /// individual fields are coerced leniently.
    pub fn from_json(body: &str) -> Result<Self, FetchError> {
        let value: Value = serde_json::from_str(body).map_err(|_| FetchError::NotJson)?;
        Self::from_value(&value)
    }

    /// Full handling of a `GET /sensor-data` answer.
    pub fn from_response(
        status: u16,
        content_type: Option<&str>,
        body: &str,
    ) -> Result<Self, FetchError> {
        Self::from_value(&interpret_response(status, content_type, body)?)
    }

    pub fn from_value(value: &Value) -> Result<Self, FetchError> {
        let object = value
            .as_object()
            .ok_or_else(|| FetchError::Malformed("expected a JSON object".into()))?;

        Ok(Self {
            temperature: number_field(object, "temperature"),
            humidity: number_field(object, "humidity"),
            soil_moisture: number_field(object, "soil_moisture"),
        })
    }

    pub fn get(&self, metric: SensorMetric) -> Option<f64> {
        match metric {
            SensorMetric::Temperature => self.temperature,
            SensorMetric::Humidity => self.humidity,
            SensorMetric::SoilMoisture => self.soil_moisture,
        }
    }
}

fn number_field(object: &Map<String, Value>, key: &str) -> Option<f64> {
    let number = match object.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// One successful poll.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub captured_at: DateTime<Utc>,
    pub reading: SensorReading,
}

impl Sample {
    pub fn new(reading: SensorReading, captured_at: DateTime<Utc>) -> Self {
        Self {
            captured_at,
            reading,
        }
    }

    pub fn now(reading: SensorReading) -> Self {
        Self::new(reading, Utc::now())
    }

    /// Wall-clock label used on the chart axis.
    pub fn time_label(&self) -> String {
        self.captured_at
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum SensorMetric {
    #[strum(serialize = "Temp (°C)")]
    Temperature,
    #[strum(serialize = "Humidity (%)")]
    Humidity,
    #[strum(serialize = "Soil")]
    SoilMoisture,
}

impl SensorMetric {
    /// Card text for a value, `None` when the reading should be skipped.
    pub fn format_value(self, value: Option<f64>) -> Option<String> {
        let value = value?;
        Some(match self {
            SensorMetric::Temperature | SensorMetric::Humidity => format!("{:.1}", value),
            SensorMetric::SoilMoisture => value.to_string(),
        })
    }

    /// Same as [`format_value`](Self::format_value) with the unit attached.
    pub fn format_with_unit(self, value: Option<f64>) -> Option<String> {
        let text = self.format_value(value)?;
        Some(match self {
            SensorMetric::Temperature => format!("{} °C", text),
            SensorMetric::Humidity => format!("{} %", text),
            SensorMetric::SoilMoisture => text,
        })
    }

    pub fn css_class(self) -> &'static str {
        match self {
            SensorMetric::Temperature => "temp",
            SensorMetric::Humidity => "hum",
            SensorMetric::SoilMoisture => "soil",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_numeric_fields() {
        let reading =
            SensorReading::from_json(r#"{"temperature": 24.5, "humidity": 61, "soil_moisture": 512}"#)
                .unwrap();
        assert_eq!(reading.temperature, Some(24.5));
        assert_eq!(reading.humidity, Some(61.0));
        assert_eq!(reading.soil_moisture, Some(512.0));
    }

    #[test]
    fn coerces_non_numeric_fields_to_none() {
        let reading = SensorReading::from_json(
            r#"{"temperature": null, "humidity": "55.5", "soil_moisture": "wet"}"#,
        )
        .unwrap();
        assert_eq!(reading.temperature, None);
        assert_eq!(reading.humidity, Some(55.5));
        assert_eq!(reading.soil_moisture, None);
    }

    #[test]
    fn missing_fields_are_none() {
        let reading = SensorReading::from_json("{}").unwrap();
        assert_eq!(reading, SensorReading::default());
    }

    #[test]
    fn rejects_non_object_bodies() {
        assert_eq!(SensorReading::from_json("<html>"), Err(FetchError::NotJson));
        assert!(matches!(
            SensorReading::from_json("[1, 2, 3]"),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn error_status_is_a_failed_poll() {
        let err = SensorReading::from_response(500, Some("text/plain"), "sensor offline")
            .unwrap_err();
        assert_eq!(
            err,
            FetchError::Status {
                status: 500,
                message: "sensor offline".into()
            }
        );
    }

    #[test]
    fn formats_cards_like_the_dashboard() {
        assert_eq!(
            SensorMetric::Temperature.format_with_unit(Some(23.456)),
            Some("23.5 °C".to_string())
        );
        assert_eq!(
            SensorMetric::Humidity.format_with_unit(Some(60.0)),
            Some("60.0 %".to_string())
        );
        assert_eq!(
            SensorMetric::SoilMoisture.format_with_unit(Some(512.0)),
            Some("512".to_string())
        );
        assert_eq!(SensorMetric::SoilMoisture.format_with_unit(None), None);
    }

    #[test]
    fn metric_labels_follow_chart_legend() {
        let labels: Vec<String> = SensorMetric::iter().map(|m| m.to_string()).collect();
        assert_eq!(labels, vec!["Temp (°C)", "Humidity (%)", "Soil"]);
    }

    #[test]
    fn time_label_is_clock_time() {
        let sample = Sample::now(SensorReading::default());
        let label = sample.time_label();
        assert_eq!(label.len(), 8);
        assert_eq!(label.matches(':').count(), 2);
    }
}
