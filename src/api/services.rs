use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::api::patch::Patch;
use crate::api::AppState;
use crate::middleware::OwnedEmail;
use crate::models::{
    DeleteAck, InsertAck, NewService, ServiceQuery, ServiceResponse, ServiceUpdate, UpdateAck,
};
use crate::services::Identity;
use crate::utils::{parse_object_id, AppError};

const TRENDING_LIMIT: i64 = 6;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive part of the service name
    pub search: Option<String>,
}

fn to_responses(services: Vec<crate::models::Service>) -> Vec<ServiceResponse> {
    services.into_iter().map(ServiceResponse::from).collect()
}

#[utoipa::path(
    get,
    path = "/services",
    tag = "Services",
    params(SearchQuery),
    responses(
        (status = 200, description = "Services whose name contains `search` (all when empty)", body = [ServiceResponse])
    )
)]
pub async fn list_services(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let query = ServiceQuery::search(query.into_inner().search);
    log::info!("📋 GET /services - search: {:?}", query.name_contains);

    let services = state.store.find_services(&query).await?;
    Ok(HttpResponse::Ok().json(to_responses(services)))
}

#[utoipa::path(
    get,
    path = "/trending-services",
    tag = "Services",
    responses(
        (status = 200, description = "First six services", body = [ServiceResponse])
    )
)]
pub async fn trending_services(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let services = state
        .store
        .find_services(&ServiceQuery::first(TRENDING_LIMIT))
        .await?;
    Ok(HttpResponse::Ok().json(to_responses(services)))
}

#[utoipa::path(
    get,
    path = "/service-detail/{id}",
    tag = "Services",
    params(("id" = String, Path, description = "Service ObjectId")),
    responses(
        (status = 200, description = "The service, or null when it does not exist", body = ServiceResponse),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("token_cookie" = []))
)]
pub async fn service_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    let service = state.store.find_service(id).await?;
    Ok(HttpResponse::Ok().json(service.map(ServiceResponse::from)))
}

#[utoipa::path(
    get,
    path = "/manage-services",
    tag = "Services",
    params(crate::middleware::EmailQuery),
    responses(
        (status = 200, description = "Services offered by the caller", body = [ServiceResponse]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "`email` is not the caller's")
    ),
    security(("token_cookie" = []))
)]
pub async fn manage_services(
    state: web::Data<AppState>,
    owner: OwnedEmail,
) -> Result<HttpResponse, AppError> {
    log::info!("🧰 GET /manage-services - provider: {}", owner.0);

    let services = state
        .store
        .find_services(&ServiceQuery::by_provider(&owner.0))
        .await?;
    Ok(HttpResponse::Ok().json(to_responses(services)))
}

#[utoipa::path(
    patch,
    path = "/update-service/{id}",
    tag = "Services",
    params(("id" = String, Path, description = "Service ObjectId")),
    request_body = ServiceUpdate,
    responses(
        (status = 200, description = "Update acknowledgement", body = UpdateAck),
        (status = 400, description = "Malformed id or body"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("token_cookie" = []))
)]
pub async fn update_service(
    state: web::Data<AppState>,
    identity: web::ReqData<Identity>,
    path: web::Path<String>,
    update: Patch<ServiceUpdate>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("🔧 PATCH /update-service/{} - by {}", id, identity.email);

    let ack = state.store.update_service(id, &update).await?;
    Ok(HttpResponse::Ok().json(ack))
}

#[utoipa::path(
    post,
    path = "/services",
    tag = "Services",
    request_body = NewService,
    responses(
        (status = 200, description = "Insert acknowledgement", body = InsertAck),
        (status = 400, description = "Body does not match the service schema"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("token_cookie" = []))
)]
pub async fn create_service(
    state: web::Data<AppState>,
    identity: web::ReqData<Identity>,
    service: web::Json<NewService>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "📝 POST /services - {} by {}",
        service.service_name,
        identity.email
    );

    let ack = state.store.insert_service(service.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ack))
}

#[utoipa::path(
    delete,
    path = "/services/{id}",
    tag = "Services",
    params(("id" = String, Path, description = "Service ObjectId")),
    responses(
        (status = 200, description = "Delete acknowledgement, deletedCount 0 when nothing matched", body = DeleteAck),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("token_cookie" = []))
)]
pub async fn delete_service(
    state: web::Data<AppState>,
    identity: web::ReqData<Identity>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("🗑️ DELETE /services/{} - by {}", id, identity.email);

    let ack = state.store.delete_service(id).await?;
    Ok(HttpResponse::Ok().json(ack))
}
