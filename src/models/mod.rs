pub mod booking;
pub mod comment;
pub mod service;
pub mod write_result;

pub use booking::*;
pub use comment::*;
pub use service::*;
pub use write_result::*;

use mongodb::bson::{Bson, Document};
use serde_json::{Map, Value};

/// Stored fields as plain JSON; BSON-only types use relaxed extended JSON.
pub fn document_to_json(doc: Document) -> Map<String, Value> {
    match Bson::Document(doc).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
