use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use shared::ValidationError;

#[derive(Serialize)]
struct ErrorResponse<'a> {
    status: &'static str,
    message: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    BadRequest(String),
    #[error("File too large (max 10 MB)")]
    TooLarge,
    #[error("Upstream request timed out")]
    UpstreamTimeout,
    #[error("Upstream unavailable: {0}")]
    Upstream(String),
}

impl From<ValidationError> for GatewayError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::TooLarge { .. } => GatewayError::TooLarge,
            other => GatewayError::BadRequest(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::UpstreamTimeout
        } else {
            GatewayError::Upstream(err.to_string())
        }
    }
}

impl From<actix_multipart::MultipartError> for GatewayError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        GatewayError::BadRequest(format!("Invalid multipart body: {}", err))
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            status: "error",
            message: &message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_client_statuses() {
        let too_large = GatewayError::from(ValidationError::TooLarge { size: 1, limit: 0 });
        assert_eq!(too_large.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

        let wrong_type = GatewayError::from(ValidationError::UnsupportedType("image/gif".into()));
        assert_eq!(wrong_type.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(wrong_type.to_string(), "Only JPG or PNG images are allowed.");
    }

    #[test]
    fn upstream_failures_are_gateway_errors() {
        assert_eq!(
            GatewayError::Upstream("connection refused".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            GatewayError::UpstreamTimeout.status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }
}
