use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ElectroSavvy API",
        version = "1.0.0",
        description = "Home-service booking backend.\n\n**Authentication:** call `POST /jwt` to receive the `token` cookie; protected routes read it. Routes taking `?email=` only answer for the caller's own email."
    ),
    paths(
        crate::api::health::health_check,

        crate::api::auth::issue_token,
        crate::api::auth::logout,

        crate::api::services::list_services,
        crate::api::services::trending_services,
        crate::api::services::service_detail,
        crate::api::services::manage_services,
        crate::api::services::update_service,
        crate::api::services::create_service,
        crate::api::services::delete_service,

        crate::api::bookings::list_bookings,
        crate::api::bookings::to_do_services,
        crate::api::bookings::create_booking,
        crate::api::bookings::update_booking_status,
        crate::api::bookings::delete_booking,

        crate::api::comments::list_comments,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::services::Identity,
            crate::models::ServiceResponse,
            crate::models::NewService,
            crate::models::ServiceUpdate,
            crate::models::BookedServiceResponse,
            crate::models::NewBooking,
            crate::models::BookingStatusUpdate,
            crate::models::BookingStatus,
            crate::models::InsertAck,
            crate::models::UpdateAck,
            crate::models::DeleteAck,
            crate::models::CommentResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Session cookie issue and removal."),
        (name = "Services", description = "Service catalog and provider management."),
        (name = "Bookings", description = "Bookings from the customer and the provider side."),
        (name = "Comments", description = "Read-only customer comments."),
        (name = "Health", description = "Liveness check."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "token_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    crate::services::TOKEN_COOKIE,
                    "Session JWT issued by POST /jwt",
                ))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_protected_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/jwt", "/services", "/manage-services", "/booked-services/{id}", "/to-do-services"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("token_cookie"));
        for schema in ["Identity", "CommentResponse", "ServiceResponse"] {
            assert!(components.schemas.contains_key(schema), "missing schema {}", schema);
        }
    }
}
