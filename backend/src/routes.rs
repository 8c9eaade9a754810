use actix_files::{Files, NamedFile};
use actix_web::dev::{ServiceRequest, ServiceResponse, fn_service};
use actix_web::{HttpRequest, HttpResponse, web};
use log::{error, info};
use serde_json::json;
use shared::EncoderRegistry;
use uuid::Uuid;

use crate::error::GatewayError;
use crate::intake::read_upload;
use crate::upstream::UpstreamClient;

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: String) {
    // client-side routes such as /dashboard fall back to the app shell
    let index = format!("{}/index.html", frontend_dir);

    cfg.service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/sensor-data").route(web::get().to(sensor_data)))
        .service(web::resource("/predict-disease").route(web::post().to(predict_disease)))
        .service(
            Files::new("/", frontend_dir)
                .index_file("index.html")
                .default_handler(fn_service(move |req: ServiceRequest| {
                    let index = index.clone();
                    async move {
                        let (req, _) = req.into_parts();
                        let file = NamedFile::open_async(index).await?;
                        let res = file.into_response(&req);
                        Ok::<_, actix_web::Error>(ServiceResponse::new(req, res))
                    }
                })),
        );
}

async fn health(upstream: web::Data<UpstreamClient>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "upstream": upstream.base().as_str(),
    }))
}

async fn sensor_data(upstream: web::Data<UpstreamClient>) -> Result<HttpResponse, GatewayError> {
    upstream.sensor_data().await.inspect_err(|e| {
        error!("sensor-data forward failed: {}", e);
    })
}

async fn predict_disease(
    req: HttpRequest,
    payload: web::Payload,
    upstream: web::Data<UpstreamClient>,
    registry: web::Data<EncoderRegistry>,
) -> Result<HttpResponse, GatewayError> {
    let request_id = Uuid::new_v4();
    let image = read_upload(&req, payload).await.inspect_err(|e| {
        info!("[{}] upload rejected: {}", request_id, e);
    })?;

    info!(
        "[{}] forwarding {} ({} bytes)",
        request_id,
        image.file_name.as_deref().unwrap_or("unnamed"),
        image.size()
    );

    let response = upstream.predict(&registry, &image).await.inspect_err(|e| {
        error!("[{}] predict forward failed: {}", request_id, e);
    })?;
    info!("[{}] upstream answered {}", request_id, response.status());
    Ok(response)
}
