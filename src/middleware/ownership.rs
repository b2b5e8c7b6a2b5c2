use actix_web::{dev::Payload, web, FromRequest, HttpMessage, HttpRequest};
use serde::Deserialize;
use std::future::{ready, Ready};

use crate::services::Identity;
use crate::utils::AppError;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailQuery {
    /// Email the listing is scoped to; must be the caller's own
    pub email: Option<String>,
}

/// `email` query parameter that has been checked against the caller's identity.
///
/// Must sit behind [`AccessGuard`](super::auth::AccessGuard): without an
/// identity in the request it answers 401, on mismatch 403.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedEmail(pub String);

impl OwnedEmail {
    pub fn into_inner(self) -> String {
        self.0
    }
}

pub fn check_ownership(identity: &Identity, requested: Option<&str>) -> Result<(), AppError> {
    match requested {
        Some(email) if email == identity.email => Ok(()),
        _ => Err(AppError::Forbidden),
    }
}

fn owned_email(req: &HttpRequest) -> Result<OwnedEmail, AppError> {
    let identity = req
        .extensions()
        .get::<Identity>()
        .cloned()
        .ok_or(AppError::Unauthorized)?;

    let query = web::Query::<EmailQuery>::from_query(req.query_string())
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?
        .into_inner();

    check_ownership(&identity, query.email.as_deref()).map_err(|e| {
        log::warn!(
            "⛔ {} {} - {} asked for {:?}",
            req.method(),
            req.path(),
            identity.email,
            query.email
        );
        e
    })?;

    Ok(OwnedEmail(identity.email))
}

impl FromRequest for OwnedEmail {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(owned_email(req))
    }
}
