use mongodb::bson::Bson;
use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};
use serde::Serialize;

// Same shape the MongoDB drivers report back to clients.

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

fn id_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<InsertOneResult> for InsertAck {
    fn from(r: InsertOneResult) -> Self {
        InsertAck {
            acknowledged: true,
            inserted_id: id_string(&r.inserted_id),
        }
    }
}

impl From<UpdateResult> for UpdateAck {
    fn from(r: UpdateResult) -> Self {
        UpdateAck {
            acknowledged: true,
            matched_count: r.matched_count,
            modified_count: r.modified_count,
            upserted_count: u64::from(r.upserted_id.is_some()),
            upserted_id: r.upserted_id.as_ref().map(id_string),
        }
    }
}

impl From<DeleteResult> for DeleteAck {
    fn from(r: DeleteResult) -> Self {
        DeleteAck {
            acknowledged: true,
            deleted_count: r.deleted_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let ack = UpdateAck {
            acknowledged: true,
            matched_count: 1,
            modified_count: 0,
            upserted_count: 0,
            upserted_id: None,
        };
        assert_eq!(
            serde_json::to_value(ack).unwrap(),
            serde_json::json!({
                "acknowledged": true,
                "matchedCount": 1,
                "modifiedCount": 0,
                "upsertedCount": 0,
                "upsertedId": null
            })
        );
    }
}
