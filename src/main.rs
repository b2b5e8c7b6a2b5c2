mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::AppState;
use crate::config::{AppConfig, StoreConfig};
use crate::database::{MemoryStore, MongoDB, Store};
use crate::services::{CookiePolicy, TokenService};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("❌ {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting ElectroSavvy server ({:?})...", config.environment);

    let store: Arc<dyn Store> = match &config.store {
        StoreConfig::Mongo { uri, database } => {
            log::info!("📊 Database: {}", database);
            let db = MongoDB::new(uri, database).await.map_err(|e| {
                log::error!("❌ Failed to connect to MongoDB: {}", e);
                io::Error::new(io::ErrorKind::ConnectionRefused, e.to_string())
            })?;
            log::info!("✅ MongoDB connected successfully");
            Arc::new(db)
        }
        StoreConfig::Memory => {
            log::warn!("⚠️  Using the in-memory store, data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = web::Data::new(AppState::new(
        store,
        TokenService::hourly(&config.token_secret),
        CookiePolicy::for_environment(config.environment),
    ));

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);

    let origins = config.cors_origins.clone();
    let openapi = api::swagger::ApiDoc::openapi();

    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .supports_credentials()
            .max_age(3600);

        let state = state.clone();

        App::new()
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            .configure(move |cfg| api::configure(cfg, state))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
