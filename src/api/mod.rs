pub mod auth;
pub mod bookings;
pub mod comments;
pub mod health;
pub mod patch;
pub mod services;
pub mod swagger;

use actix_web::{guard, web};
use std::sync::Arc;

use crate::database::Store;
use crate::middleware::AccessGuard;
use crate::services::{CookiePolicy, TokenService};
use crate::utils::AppError;

/// Everything a handler needs, built once at startup
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenService,
    pub cookies: CookiePolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService, cookies: CookiePolicy) -> Self {
        Self {
            store,
            tokens,
            cookies,
        }
    }
}

/// Registers every route. Protected resources are wrapped in [`AccessGuard`].
pub fn configure(cfg: &mut web::ServiceConfig, state: web::Data<AppState>) {
    let access = AccessGuard::new(state.tokens.clone());

    cfg.app_data(state)
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            AppError::InvalidRequest(err.to_string()).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            AppError::InvalidRequest(err.to_string()).into()
        }))
        .route("/", web::get().to(health::banner))
        .route("/health", web::get().to(health::health_check))
        // Auth
        .route("/jwt", web::post().to(auth::issue_token))
        .route("/logout", web::post().to(auth::logout))
        // Public catalog
        .service(
            web::resource("/services")
                .guard(guard::Get())
                .route(web::get().to(services::list_services)),
        )
        .route("/trending-services", web::get().to(services::trending_services))
        .route("/comments", web::get().to(comments::list_comments))
        // Services (token required)
        .service(
            web::resource("/services")
                .guard(guard::Post())
                .wrap(access.clone())
                .route(web::post().to(services::create_service)),
        )
        .service(
            web::resource("/services/{id}")
                .wrap(access.clone())
                .route(web::delete().to(services::delete_service)),
        )
        .service(
            web::resource("/service-detail/{id}")
                .wrap(access.clone())
                .route(web::get().to(services::service_detail)),
        )
        .service(
            web::resource("/manage-services")
                .wrap(access.clone())
                .route(web::get().to(services::manage_services)),
        )
        .service(
            web::resource("/update-service/{id}")
                .wrap(access.clone())
                .route(web::patch().to(services::update_service)),
        )
        // Bookings (token required)
        .service(
            web::resource("/booked-services")
                .wrap(access.clone())
                .route(web::get().to(bookings::list_bookings))
                .route(web::post().to(bookings::create_booking)),
        )
        .service(
            web::resource("/booked-services/{id}")
                .wrap(access.clone())
                .route(web::patch().to(bookings::update_booking_status))
                .route(web::delete().to(bookings::delete_booking)),
        )
        .service(
            web::resource("/to-do-services")
                .wrap(access)
                .route(web::get().to(bookings::to_do_services)),
        );
}
