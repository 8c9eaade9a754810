use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;
use crate::http::interpret_response;

/// Body of `POST /predict-disease` as either contract may send it.
///
/// The canonical shape is `{ status, predicted_disease, confidence, treatment }`
/// with confidence in percent. The older app contract sent
/// `{ prediction, confidence, recommendation }` with confidence as a fraction
/// and no `status` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub predicted_disease: Option<String>,
    #[serde(default)]
    pub prediction: Option<String>,
    #[serde(default)]
    pub confidence: Option<Value>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceScale {
    Percent,
    Fraction,
}

/// Normalized classifier output for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub label: String,
    /// Always 0–100.
    pub confidence_pct: Option<f64>,
    pub guidance: Option<String>,
}

impl Diagnosis {
    /// `Confidence: 87.3%` style text with the given number of decimals.
    pub fn confidence_text(&self, decimals: usize) -> Option<String> {
        self.confidence_pct.map(|pct| format!("{:.*}%", decimals, pct))
    }
}

impl PredictionResponse {
    pub fn from_value(value: Value) -> Result<Self, FetchError> {
        serde_json::from_value(value).map_err(|e| FetchError::Malformed(e.to_string()))
    }

    pub fn scale(&self) -> ConfidenceScale {
        if self.status.is_some() {
            ConfidenceScale::Percent
        } else {
            ConfidenceScale::Fraction
        }
    }

    /// Checks the success indicator and folds both contracts into a [`Diagnosis`].
    pub fn into_diagnosis(self) -> Result<Diagnosis, FetchError> {
        let scale = self.scale();
        match self.status.as_deref() {
            Some("success") => {}
            Some(_) => {
                return Err(FetchError::Rejected(
                    self.message
                        .unwrap_or_else(|| "Prediction failed.".to_string()),
                ));
            }
            None if self.prediction.is_none() => {
                return Err(FetchError::Rejected(
                    self.message
                        .unwrap_or_else(|| "Prediction failed.".to_string()),
                ));
            }
            None => {}
        }

        let confidence_pct = self
            .confidence
            .as_ref()
            .and_then(coerce_number)
            .map(|c| match scale {
                ConfidenceScale::Percent => c,
                ConfidenceScale::Fraction => c * 100.0,
            });

        Ok(Diagnosis {
            label: self
                .predicted_disease
                .or(self.prediction)
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| "Prediction".to_string()),
            confidence_pct,
            guidance: self.treatment.or(self.recommendation).filter(|g| !g.is_empty()),
        })
    }
}

/// Full handling of a `POST /predict-disease` answer.
pub fn diagnosis_from_response(
    status: u16,
    content_type: Option<&str>,
    body: &str,
) -> Result<Diagnosis, FetchError> {
    let value = interpret_response(status, content_type, body)?;
    PredictionResponse::from_value(value)?.into_diagnosis()
}

fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn diagnose(value: Value) -> Result<Diagnosis, FetchError> {
        PredictionResponse::from_value(value)?.into_diagnosis()
    }

    #[test]
    fn canonical_response_keeps_percent() {
        let diagnosis = diagnose(json!({
            "status": "success",
            "predicted_disease": "Tomato___Late_blight",
            "confidence": 93.41,
            "treatment": "Use Mancozeb or Chlorothalonil fungicide."
        }))
        .unwrap();

        assert_eq!(diagnosis.label, "Tomato___Late_blight");
        assert_eq!(diagnosis.confidence_pct, Some(93.41));
        assert_eq!(diagnosis.confidence_text(2).as_deref(), Some("93.41%"));
        assert_eq!(
            diagnosis.guidance.as_deref(),
            Some("Use Mancozeb or Chlorothalonil fungicide.")
        );
    }

    #[test]
    fn legacy_response_is_scaled_to_percent() {
        let diagnosis = diagnose(json!({
            "prediction": "Potato___healthy",
            "confidence": "0.875",
            "recommendation": "No treatment needed."
        }))
        .unwrap();

        assert_eq!(diagnosis.confidence_pct, Some(87.5));
        assert_eq!(diagnosis.confidence_text(1).as_deref(), Some("87.5%"));
        assert_eq!(diagnosis.guidance.as_deref(), Some("No treatment needed."));
    }

    #[test]
    fn error_status_is_rejected_with_server_message() {
        let err = diagnose(json!({ "status": "error", "message": "Only .jpg/.jpeg/.png allowed" }))
            .unwrap_err();
        assert_eq!(err, FetchError::Rejected("Only .jpg/.jpeg/.png allowed".into()));
    }

    #[test]
    fn missing_success_indicator_is_rejected() {
        let err = diagnose(json!({ "confidence": 0.4 })).unwrap_err();
        assert_eq!(err, FetchError::Rejected("Prediction failed.".into()));
    }

    #[test]
    fn http_error_body_becomes_the_message() {
        let err = diagnosis_from_response(
            500,
            Some("application/json"),
            r#"{"status":"error","message":"cannot identify image file"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "cannot identify image file");
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let diagnosis = diagnose(json!({ "status": "success", "confidence": "n/a" })).unwrap();
        assert_eq!(diagnosis.label, "Prediction");
        assert_eq!(diagnosis.confidence_pct, None);
        assert_eq!(diagnosis.confidence_text(1), None);
        assert_eq!(diagnosis.guidance, None);
    }
}
