// Utility functions
pub mod error;

pub use error::*;

use mongodb::bson::oid::ObjectId;

/// Parses a path id into an ObjectId, rejecting anything that is not 24 hex chars.
pub fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidRequest(format!("Invalid id: {}", id)))
}
