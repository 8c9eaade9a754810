mod config;
mod error;
mod intake;
mod routes;
mod upstream;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use config::GatewayConfig;
use routes::configure_routes;
use shared::EncoderRegistry;
use std::env;
use upstream::UpstreamClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = GatewayConfig::from_env().map_err(|e| {
        log::error!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("Forwarding API calls to {}", config.upstream);
    log::info!("Serving frontend from {}", config.frontend_dir);

    let upstream = web::Data::new(UpstreamClient::new(config.upstream.clone()));
    let registry = web::Data::new(EncoderRegistry::default());
    let frontend_dir = config.frontend_dir.clone();
    let bind_address = config.bind_address();

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(upstream.clone())
            .app_data(registry.clone())
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
