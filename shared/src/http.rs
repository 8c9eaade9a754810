use serde_json::Value;

use crate::error::FetchError;

/// Base URL of the remote API. Empty means same origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiBase(String);

impl ApiBase {
    pub fn new(base: impl AsRef<str>) -> Self {
        Self(base.as_ref().trim().trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_same_origin(&self) -> bool {
        self.0.is_empty()
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }

    pub fn sensor_data_url(&self) -> String {
        self.endpoint(crate::SENSOR_DATA_PATH)
    }

    pub fn predict_url(&self) -> String {
        self.endpoint(crate::PREDICT_PATH)
    }
}

impl std::fmt::Display for ApiBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_same_origin() {
            write!(f, "(same origin)")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}

/// Turns a finished HTTP exchange into JSON or an error carrying the most
/// specific message the server gave.
pub fn interpret_response(
    status: u16,
    content_type: Option<&str>,
    body: &str,
) -> Result<Value, FetchError> {
    let ok = (200..300).contains(&status);

    if is_json_content_type(content_type) {
        let data: Value = serde_json::from_str(body).map_err(|_| {
            if ok {
                FetchError::NotJson
            } else {
                status_error(status, body)
            }
        })?;
        if !ok {
            let message = server_message(&data).unwrap_or_else(|| format!("HTTP {}", status));
            return Err(FetchError::Status { status, message });
        }
        return Ok(data);
    }

    if !ok {
        return Err(status_error(status, body));
    }
    serde_json::from_str(body).map_err(|_| FetchError::NotJson)
}

fn status_error(status: u16, body: &str) -> FetchError {
    let text = body.trim();
    FetchError::Status {
        status,
        message: if text.is_empty() {
            format!("HTTP {}", status)
        } else {
            text.to_string()
        },
    }
}

/// `message`, `error` or `detail`, whichever the server filled in first.
pub fn server_message(data: &Value) -> Option<String> {
    ["message", "error", "detail"]
        .iter()
        .filter_map(|key| data.get(*key))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_url_joins_endpoints() {
        let base = ApiBase::new("http://192.168.1.20:5000/");
        assert_eq!(base.sensor_data_url(), "http://192.168.1.20:5000/sensor-data");
        assert_eq!(base.predict_url(), "http://192.168.1.20:5000/predict-disease");
    }

    #[test]
    fn same_origin_uses_absolute_paths() {
        let base = ApiBase::new("  ");
        assert!(base.is_same_origin());
        assert_eq!(base.sensor_data_url(), "/sensor-data");
        assert_eq!(base.to_string(), "(same origin)");
    }

    #[test]
    fn json_success_is_returned() {
        let data = interpret_response(200, Some("application/json; charset=utf-8"), r#"{"a":1}"#)
            .unwrap();
        assert_eq!(data, json!({"a": 1}));
    }

    #[test]
    fn json_error_prefers_server_message() {
        let err = interpret_response(
            413,
            Some("application/json"),
            r#"{"status":"error","message":"File too large (max 10 MB)"}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            FetchError::Status {
                status: 413,
                message: "File too large (max 10 MB)".into()
            }
        );

        let err = interpret_response(500, Some("application/json"), r#"{"detail":"boom"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");

        let err = interpret_response(404, Some("application/json"), "{}").unwrap_err();
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[test]
    fn text_error_uses_body_or_status() {
        let err = interpret_response(502, Some("text/html"), "Bad Gateway").unwrap_err();
        assert_eq!(err.to_string(), "Bad Gateway");

        let err = interpret_response(503, None, "").unwrap_err();
        assert_eq!(err.to_string(), "HTTP 503");
    }

    #[test]
    fn untyped_success_must_still_be_json() {
        assert_eq!(
            interpret_response(200, Some("text/plain"), r#"{"ok":true}"#).unwrap(),
            json!({"ok": true})
        );
        assert_eq!(
            interpret_response(200, Some("text/html"), "<html></html>"),
            Err(FetchError::NotJson)
        );
    }
}
