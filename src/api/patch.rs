use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use mongodb::bson::Document;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::utils::AppError;

/// Update body with a declared set of writable fields.
pub trait Whitelist: DeserializeOwned + Serialize {
    /// Wire names of the fields an update may touch
    const FIELDS: &'static [&'static str];

    /// `$set` document for the store; holds exactly the whitelisted fields
    fn set_document(&self) -> Result<Document, AppError> {
        Ok(mongodb::bson::to_document(self)?)
    }
}

/// Keeps only whitelisted keys, returning the names that were dropped.
pub fn retain_whitelisted(body: &mut Map<String, Value>, fields: &[&str]) -> Vec<String> {
    let dropped: Vec<String> = body
        .keys()
        .filter(|k| !fields.contains(&k.as_str()))
        .cloned()
        .collect();
    for key in &dropped {
        body.remove(key);
    }
    dropped
}

/// JSON extractor enforcing `T::FIELDS`: keys outside the whitelist are ignored,
/// then the rest must deserialize into `T`.
#[derive(Debug)]
pub struct Patch<T>(pub T);

impl<T> std::ops::Deref for Patch<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Whitelist + 'static> FromRequest for Patch<T> {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<Map<String, Value>>::from_request(req, payload);
        let path = req.path().to_string();

        Box::pin(async move {
            let mut body = body.await?.into_inner();

            let dropped = retain_whitelisted(&mut body, T::FIELDS);
            if !dropped.is_empty() {
                log::debug!("PATCH {} - ignoring non-writable fields {:?}", path, dropped);
            }

            let update = serde_json::from_value::<T>(Value::Object(body))
                .map_err(|e| AppError::InvalidRequest(e.to_string()))?;
            Ok(Patch(update))
        })
    }
}
