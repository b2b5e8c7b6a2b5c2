use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::document_to_json;
use crate::api::patch::Whitelist;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Working,
    Completed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Working => write!(f, "working"),
            BookingStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A booking of a service by a consuming user (stored in `BookedServices`).
/// The two emails drive the scoped listings; the rest is kept as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedService {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user_email: Option<String>,
    #[serde(flatten)]
    pub details: Document,
}

/// Body of `POST /booked-services`
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewBooking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_price: Option<f64>,
    pub service_provider_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider_name: Option<String>,
    pub current_user_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_taking_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instruction: Option<String>,
    #[serde(default)]
    pub status: BookingStatus,
}

/// Body of `PATCH /booked-services/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}

impl Whitelist for BookingStatusUpdate {
    const FIELDS: &'static [&'static str] = &["status"];
}

/// Which side of a booking a listing is scoped to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingQuery {
    Customer(String),
    Provider(String),
}

impl BookingQuery {
    pub fn matches(&self, booking: &BookedService) -> bool {
        match self {
            BookingQuery::Customer(email) => {
                booking.current_user_email.as_deref() == Some(email.as_str())
            }
            BookingQuery::Provider(email) => {
                booking.service_provider_email.as_deref() == Some(email.as_str())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookedServiceResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user_email: Option<String>,
    /// `status`, `serviceName`, `serviceTakingDate` and any other stored field
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl From<BookedService> for BookedServiceResponse {
    fn from(b: BookedService) -> Self {
        BookedServiceResponse {
            id: b.id.to_hex(),
            service_provider_email: b.service_provider_email,
            current_user_email: b.current_user_email,
            details: document_to_json(b.details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document};

    #[test]
    fn test_new_booking_defaults_to_pending() {
        let booking: NewBooking = serde_json::from_value(serde_json::json!({
            "serviceProviderEmail": "pro@x.com",
            "currentUserEmail": "me@x.com",
            "serviceName": "Fan Repair"
        }))
        .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
    }

    #[test]
    fn test_new_booking_rejects_unknown_fields() {
        let result = serde_json::from_value::<NewBooking>(serde_json::json!({
            "serviceProviderEmail": "pro@x.com",
            "currentUserEmail": "me@x.com",
            "isAdmin": true
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        let result = serde_json::from_value::<BookingStatusUpdate>(serde_json::json!({
            "status": "archived"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_query_scopes_by_side() {
        let booking: BookedService = from_document(doc! {
            "_id": ObjectId::new(),
            "serviceProviderEmail": "pro@x.com",
            "currentUserEmail": "me@x.com",
            "status": "working"
        })
        .unwrap();

        assert!(BookingQuery::Customer("me@x.com".into()).matches(&booking));
        assert!(!BookingQuery::Customer("pro@x.com".into()).matches(&booking));
        assert!(BookingQuery::Provider("pro@x.com".into()).matches(&booking));
    }

    #[test]
    fn test_stored_booking_with_free_form_fields() {
        let booking: BookedService = from_document(doc! {
            "_id": ObjectId::new(),
            "currentUserEmail": "me@x.com",
            "servicePrice": "1200",
            "status": "on hold"
        })
        .unwrap();
        assert!(booking.service_provider_email.is_none());
        assert!(!BookingQuery::Provider("pro@x.com".into()).matches(&booking));

        let json = serde_json::to_value(BookedServiceResponse::from(booking)).unwrap();
        assert_eq!(json["servicePrice"], "1200");
        assert_eq!(json["status"], "on hold");
        assert!(json.get("serviceProviderEmail").is_none());
    }
}
