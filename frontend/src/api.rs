use std::future::Future;
use std::time::Duration;

use futures::future::{Either, select};
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use shared::upload::FilePart;
use shared::{
    ApiBase, Diagnosis, FetchError, POLL_TIMEOUT, Sample, SensorReading, UPLOAD_TIMEOUT,
    UploadBody, diagnosis_from_response,
};
use wasm_bindgen::JsValue;

/// Resolves to `FetchError::Timeout` when `request` outlives `limit`.
/// The request itself is not cancelled.
async fn with_timeout<T>(
    limit: Duration,
    request: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    let timer = TimeoutFuture::new(limit.as_millis() as u32);
    match select(Box::pin(request), Box::pin(timer)).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(FetchError::Timeout(limit.as_secs())),
    }
}

fn network_error(err: gloo_net::Error) -> FetchError {
    FetchError::Network(err.to_string())
}

fn js_error(err: JsValue) -> FetchError {
    FetchError::Network(format!("{:?}", err))
}

async fn read_response(response: Response) -> Result<(u16, Option<String>, String), FetchError> {
    let status = response.status();
    let content_type = response.headers().get("content-type");
    let body = response.text().await.map_err(network_error)?;
    Ok((status, content_type, body))
}

pub async fn fetch_sample(api: &ApiBase) -> Result<Sample, FetchError> {
    let url = api.sensor_data_url();
    with_timeout(POLL_TIMEOUT, async move {
        let response = Request::get(&url).send().await.map_err(network_error)?;
        let (status, content_type, body) = read_response(response).await?;
        let reading = SensorReading::from_response(status, content_type.as_deref(), &body)?;
        Ok(Sample::now(reading))
    })
    .await
}

pub async fn submit_prediction(api: &ApiBase, body: UploadBody) -> Result<Diagnosis, FetchError> {
    let url = api.predict_url();
    with_timeout(UPLOAD_TIMEOUT, async move {
        // the browser sets the multipart boundary itself
        let request = match body {
            UploadBody::Multipart(part) => Request::post(&url)
                .body(form_data(&part)?)
                .map_err(network_error)?,
            UploadBody::Json(payload) => Request::post(&url)
                .json(&payload)
                .map_err(network_error)?,
        };

        let response = request.send().await.map_err(network_error)?;
        let (status, content_type, text) = read_response(response).await?;
        diagnosis_from_response(status, content_type.as_deref(), &text)
    })
    .await
}

fn form_data(part: &FilePart) -> Result<web_sys::FormData, FetchError> {
    let blob = gloo_file::Blob::new_with_options(part.bytes.as_slice(), Some(part.content_type.as_str()));
    let blob: web_sys::Blob = blob.into();
    let form = web_sys::FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename(part.field, &blob, &part.file_name)
        .map_err(js_error)?;
    Ok(form)
}
