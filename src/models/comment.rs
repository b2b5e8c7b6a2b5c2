use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::document_to_json;

/// Read-only comment, passed through as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(flatten)]
    pub details: Document,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CommentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    /// `content` and any other stored field
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl From<Comment> for CommentResponse {
    fn from(c: Comment) -> Self {
        CommentResponse {
            id: c.id.to_hex(),
            details: document_to_json(c.details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_extra_fields_are_passed_through() {
        let id = ObjectId::new();
        let comment = Comment {
            id,
            details: doc! { "content": "Quick and tidy work", "name": "Rahim", "rating": 5 },
        };

        let json = serde_json::to_value(CommentResponse::from(comment)).unwrap();
        assert_eq!(json["_id"], id.to_hex());
        assert_eq!(json["content"], "Quick and tidy work");
        assert_eq!(json["name"], "Rahim");
        assert_eq!(json["rating"], 5);
    }

    #[test]
    fn test_comment_without_content_reads() {
        let comment: Comment = mongodb::bson::from_document(doc! {
            "_id": ObjectId::new(),
            "name": "Rahim"
        })
        .unwrap();
        let json = serde_json::to_value(CommentResponse::from(comment)).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["name"], "Rahim");
    }
}
