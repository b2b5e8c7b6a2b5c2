use actix_web::{web, HttpResponse};

use crate::api::patch::Patch;
use crate::api::AppState;
use crate::middleware::OwnedEmail;
use crate::models::{
    BookedService, BookedServiceResponse, BookingQuery, BookingStatusUpdate, DeleteAck,
    InsertAck, NewBooking, UpdateAck,
};
use crate::services::Identity;
use crate::utils::{parse_object_id, AppError};

fn to_responses(bookings: Vec<BookedService>) -> Vec<BookedServiceResponse> {
    bookings.into_iter().map(BookedServiceResponse::from).collect()
}

/// GET /booked-services - bookings the caller made
#[utoipa::path(
    get,
    path = "/booked-services",
    tag = "Bookings",
    params(crate::middleware::EmailQuery),
    responses(
        (status = 200, description = "Bookings made by the caller", body = [BookedServiceResponse]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "`email` is not the caller's")
    ),
    security(("token_cookie" = []))
)]
pub async fn list_bookings(
    state: web::Data<AppState>,
    owner: OwnedEmail,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /booked-services - customer: {}", owner.0);

    let bookings = state
        .store
        .find_bookings(&BookingQuery::Customer(owner.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(to_responses(bookings)))
}

/// GET /to-do-services - bookings of the caller's own services
#[utoipa::path(
    get,
    path = "/to-do-services",
    tag = "Bookings",
    params(crate::middleware::EmailQuery),
    responses(
        (status = 200, description = "Bookings the caller has to serve", body = [BookedServiceResponse]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "`email` is not the caller's")
    ),
    security(("token_cookie" = []))
)]
pub async fn to_do_services(
    state: web::Data<AppState>,
    owner: OwnedEmail,
) -> Result<HttpResponse, AppError> {
    log::info!("🛠️ GET /to-do-services - provider: {}", owner.0);

    let bookings = state
        .store
        .find_bookings(&BookingQuery::Provider(owner.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(to_responses(bookings)))
}

#[utoipa::path(
    post,
    path = "/booked-services",
    tag = "Bookings",
    request_body = NewBooking,
    responses(
        (status = 200, description = "Insert acknowledgement", body = InsertAck),
        (status = 400, description = "Body does not match the booking schema"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("token_cookie" = []))
)]
pub async fn create_booking(
    state: web::Data<AppState>,
    identity: web::ReqData<Identity>,
    booking: web::Json<NewBooking>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "📝 POST /booked-services - {} books from {}",
        identity.email,
        booking.service_provider_email
    );

    let ack = state.store.insert_booking(booking.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ack))
}

#[utoipa::path(
    patch,
    path = "/booked-services/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking ObjectId")),
    request_body = BookingStatusUpdate,
    responses(
        (status = 200, description = "Update acknowledgement", body = UpdateAck),
        (status = 400, description = "Malformed id or status"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("token_cookie" = []))
)]
pub async fn update_booking_status(
    state: web::Data<AppState>,
    identity: web::ReqData<Identity>,
    path: web::Path<String>,
    update: Patch<BookingStatusUpdate>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!(
        "🔧 PATCH /booked-services/{} - status {} by {}",
        id,
        update.status,
        identity.email
    );

    let ack = state.store.update_booking(id, &update).await?;
    Ok(HttpResponse::Ok().json(ack))
}

#[utoipa::path(
    delete,
    path = "/booked-services/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking ObjectId")),
    responses(
        (status = 200, description = "Delete acknowledgement, deletedCount 0 when nothing matched", body = DeleteAck),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("token_cookie" = []))
)]
pub async fn delete_booking(
    state: web::Data<AppState>,
    identity: web::ReqData<Identity>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("🗑️ DELETE /booked-services/{} - by {}", id, identity.email);

    let ack = state.store.delete_booking(id).await?;
    Ok(HttpResponse::Ok().json(ack))
}
