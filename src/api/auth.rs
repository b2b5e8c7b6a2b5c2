use actix_web::{web, HttpResponse};

use crate::api::AppState;
use crate::services::Identity;
use crate::utils::AppError;

/// Issues the session cookie for the posted identity (`{ email, ...claims }`)
#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Auth",
    request_body = Identity,
    responses(
        (status = 200, description = "Cookie `token` set"),
        (status = 400, description = "Missing or empty email")
    )
)]
pub async fn issue_token(
    state: web::Data<AppState>,
    request: web::Json<Identity>,
) -> Result<HttpResponse, AppError> {
    let identity = request.into_inner();
    if identity.email.trim().is_empty() {
        return Err(AppError::InvalidRequest("email is required".to_string()));
    }

    log::info!("🔐 POST /jwt - email: {}", identity.email);

    let token = state.tokens.issue(&identity)?;

    Ok(HttpResponse::Ok()
        .cookie(state.cookies.session_cookie(token))
        .json(serde_json::json!({ "success": true })))
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Cookie `token` cleared")
    )
)]
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    log::info!("👋 POST /logout");

    HttpResponse::Ok()
        .cookie(state.cookies.removal_cookie())
        .json(serde_json::json!({ "success": true }))
}
