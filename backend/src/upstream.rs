use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use shared::{
    EncoderRegistry, PREDICT_PATH, POLL_TIMEOUT, PickedImage, Platform, SENSOR_DATA_PATH,
    UPLOAD_TIMEOUT, UploadBody,
};
use url::Url;

use crate::error::GatewayError;

/// Forwards the two API calls to the real service and relays its answers.
#[derive(Clone)]
pub struct UpstreamClient {
    base: Url,
    http: Client,
}

impl UpstreamClient {
    pub fn new(mut base: Url) -> Self {
        // keep any path prefix when joining endpoints
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            base,
            http: Client::new(),
        }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| GatewayError::Upstream(e.to_string()))
    }

    pub async fn sensor_data(&self) -> Result<HttpResponse, GatewayError> {
        let url = self.endpoint(SENSOR_DATA_PATH)?;
        let response = self.http.get(url).timeout(POLL_TIMEOUT).send().await?;
        relay(response).await
    }

    /// Sends `image` the way a native client would: multipart, field `file`.
    pub async fn predict(
        &self,
        registry: &EncoderRegistry,
        image: &PickedImage,
    ) -> Result<HttpResponse, GatewayError> {
        let url = self.endpoint(PREDICT_PATH)?;
        let request = self.http.post(url).timeout(UPLOAD_TIMEOUT);

        let request = match registry.encode(Platform::Native, image)? {
            UploadBody::Multipart(part) => {
                let file = Part::bytes(part.bytes)
                    .file_name(part.file_name)
                    .mime_str(&part.content_type)?;
                request.multipart(Form::new().part(part.field, file))
            }
            UploadBody::Json(body) => request.json(&body),
        };

        relay(request.send().await?).await
    }
}

async fn relay(response: reqwest::Response) -> Result<HttpResponse, GatewayError> {
    let status = StatusCode::from_u16(response.status().as_u16())
        .map_err(|e| GatewayError::Upstream(e.to_string()))?;
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    let body = response.bytes().await?;

    if !status.is_success() {
        log::warn!("upstream answered {}", status);
    }
    Ok(HttpResponse::build(status)
        .content_type(content_type)
        .body(body.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_keep_base_path() {
        let client = UpstreamClient::new(Url::parse("http://10.0.0.5:5000/api").unwrap());
        assert_eq!(
            client.endpoint(SENSOR_DATA_PATH).unwrap().as_str(),
            "http://10.0.0.5:5000/api/sensor-data"
        );
        assert_eq!(
            client.endpoint(PREDICT_PATH).unwrap().as_str(),
            "http://10.0.0.5:5000/api/predict-disease"
        );
    }
}
