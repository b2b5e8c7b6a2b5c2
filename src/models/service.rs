use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::document_to_json;
use crate::api::patch::Whitelist;

/// Service offered by a provider (stored in the `Services` collection).
///
/// Only the fields used for filtering are typed; everything else is kept as
/// stored, so documents written by older clients still read back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider_email: Option<String>,
    #[serde(flatten)]
    pub details: Document,
}

/// Body of `POST /services`
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewService {
    pub service_name: String,
    pub service_image: String,
    pub service_price: f64,
    #[serde(rename = "ServiceArea")]
    pub service_area: String,
    pub description: String,
    pub service_provider_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider_image: Option<String>,
}

/// Body of `PATCH /update-service/{id}`. Replaces exactly these five fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServiceUpdate {
    pub service_name: String,
    pub service_image: String,
    pub service_price: f64,
    #[serde(rename = "ServiceArea")]
    pub service_area: String,
    pub description: String,
}

impl Whitelist for ServiceUpdate {
    const FIELDS: &'static [&'static str] = &[
        "serviceName",
        "serviceImage",
        "servicePrice",
        "ServiceArea",
        "description",
    ];
}

/// Filter for service listings. Empty query lists everything.
#[derive(Debug, Clone, Default)]
pub struct ServiceQuery {
    /// Case-insensitive substring of `serviceName`
    pub name_contains: Option<String>,
    pub provider_email: Option<String>,
    pub limit: Option<i64>,
}

impl ServiceQuery {
    pub fn search(term: Option<String>) -> Self {
        Self {
            name_contains: term.filter(|t| !t.is_empty()),
            ..Self::default()
        }
    }

    pub fn by_provider(email: &str) -> Self {
        Self {
            provider_email: Some(email.to_string()),
            ..Self::default()
        }
    }

    pub fn first(limit: i64) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn matches(&self, service: &Service) -> bool {
        let name_ok = self.name_contains.as_ref().map_or(true, |term| {
            service
                .service_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&term.to_lowercase()))
        });
        let provider_ok = self.provider_email.as_ref().map_or(true, |email| {
            service.service_provider_email.as_deref() == Some(email.as_str())
        });
        name_ok && provider_ok
    }
}

/// A stored service as returned to clients: hex `_id`, other fields as stored
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider_email: Option<String>,
    /// `serviceImage`, `servicePrice`, `ServiceArea`, `description` and any other stored field
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl From<Service> for ServiceResponse {
    fn from(s: Service) -> Self {
        ServiceResponse {
            id: s.id.to_hex(),
            service_name: s.service_name,
            service_provider_email: s.service_provider_email,
            details: document_to_json(s.details),
        }
    }
}
