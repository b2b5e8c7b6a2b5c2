use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Unauthorized,
    Forbidden,
    InvalidRequest(String),
    DatabaseError(String),
    Internal(String),
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Unauthorized => write!(f, "Unauthorized access"),
            AppError::Forbidden => write!(f, "Forbidden Access"),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Message shown to the client. Store and internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Unauthorized => "Unauthorized access".to_string(),
            AppError::Forbidden => "Forbidden Access".to_string(),
            AppError::InvalidRequest(msg) => msg.clone(),
            AppError::DatabaseError(_) => "Database error".to_string(),
            AppError::Internal(_) | AppError::Config(_) => "Internal server error".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) | AppError::Internal(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("❌ {}", self);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": self.public_message()
        }))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(e: mongodb::bson::ser::Error) -> Self {
        AppError::Internal(format!("Failed to encode document: {}", e))
    }
}

impl From<mongodb::bson::de::Error> for AppError {
    fn from(e: mongodb::bson::de::Error) -> Self {
        AppError::Internal(format!("Failed to decode document: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(err: AppError) -> serde_json::Value {
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::InvalidRequest("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DatabaseError("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_auth_errors_use_message_body() {
        assert_eq!(
            body_of(AppError::Unauthorized).await,
            serde_json::json!({ "message": "Unauthorized access" })
        );
        assert_eq!(
            body_of(AppError::Forbidden).await,
            serde_json::json!({ "message": "Forbidden Access" })
        );
    }

    #[actix_web::test]
    async fn test_database_detail_is_not_exposed() {
        let body = body_of(AppError::DatabaseError("connection refused at 10.0.0.3".into())).await;
        assert_eq!(body["message"], "Database error");
    }
}
