use async_trait::async_trait;
use mongodb::bson::{self, oid::ObjectId, Document};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use super::Store;
use crate::api::patch::Whitelist;
use crate::models::{
    BookedService, BookingQuery, BookingStatusUpdate, Comment, DeleteAck, InsertAck, NewBooking,
    NewService, Service, ServiceQuery, ServiceUpdate, UpdateAck,
};
use crate::utils::AppError;

/// In-process store for local development (`STORE_BACKEND=memory`) and tests.
/// Keeps insertion order, like a collection scan without a sort.
#[derive(Default)]
pub struct MemoryStore {
    services: RwLock<Vec<Service>>,
    bookings: RwLock<Vec<BookedService>>,
    comments: RwLock<Vec<Comment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_comments(comments: Vec<Comment>) -> Self {
        Self {
            comments: RwLock::new(comments),
            ..Self::default()
        }
    }

    /// Stores a service document as written, bypassing the create schema
    pub async fn insert_raw_service(&self, doc: Document) -> Result<(), AppError> {
        self.services.write().await.push(bson::from_document(doc)?);
        Ok(())
    }
}

/// The record as the store would read it back after inserting `body` under `id`.
fn stored<B: Serialize, R: DeserializeOwned>(body: &B, id: ObjectId) -> Result<R, AppError> {
    let mut doc = bson::to_document(body)?;
    doc.insert("_id", id);
    Ok(bson::from_document(doc)?)
}

/// `$set` on an in-memory record. Returns whether any value changed.
fn apply_set<R: Serialize + DeserializeOwned>(
    record: &mut R,
    fields: Document,
) -> Result<bool, AppError> {
    let mut doc = bson::to_document(record)?;
    let before = doc.clone();
    for (key, value) in fields {
        doc.insert(key, value);
    }
    if doc == before {
        return Ok(false);
    }
    *record = bson::from_document(doc)?;
    Ok(true)
}

fn update_ack(matched: bool, modified: bool) -> UpdateAck {
    UpdateAck {
        acknowledged: true,
        matched_count: u64::from(matched),
        modified_count: u64::from(modified),
        upserted_count: 0,
        upserted_id: None,
    }
}

fn delete_ack(deleted: bool) -> DeleteAck {
    DeleteAck {
        acknowledged: true,
        deleted_count: u64::from(deleted),
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_services(&self, query: &ServiceQuery) -> Result<Vec<Service>, AppError> {
        let services = self.services.read().await;
        let matching = services.iter().filter(|s| query.matches(s)).cloned();
        Ok(match query.limit {
            Some(limit) if limit > 0 => matching.take(limit as usize).collect(),
            _ => matching.collect(),
        })
    }

    async fn find_service(&self, id: ObjectId) -> Result<Option<Service>, AppError> {
        let services = self.services.read().await;
        Ok(services.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_service(&self, service: NewService) -> Result<InsertAck, AppError> {
        let id = ObjectId::new();
        self.services.write().await.push(stored(&service, id)?);
        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id.to_hex(),
        })
    }

    async fn update_service(
        &self,
        id: ObjectId,
        update: &ServiceUpdate,
    ) -> Result<UpdateAck, AppError> {
        let mut services = self.services.write().await;
        Ok(match services.iter_mut().find(|s| s.id == id) {
            Some(service) => update_ack(true, apply_set(service, update.set_document()?)?),
            None => update_ack(false, false),
        })
    }

    async fn delete_service(&self, id: ObjectId) -> Result<DeleteAck, AppError> {
        let mut services = self.services.write().await;
        let before = services.len();
        services.retain(|s| s.id != id);
        Ok(delete_ack(services.len() < before))
    }

    async fn find_bookings(&self, query: &BookingQuery) -> Result<Vec<BookedService>, AppError> {
        let bookings = self.bookings.read().await;
        Ok(bookings.iter().filter(|b| query.matches(b)).cloned().collect())
    }

    async fn insert_booking(&self, booking: NewBooking) -> Result<InsertAck, AppError> {
        let id = ObjectId::new();
        self.bookings.write().await.push(stored(&booking, id)?);
        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id.to_hex(),
        })
    }

    async fn update_booking(
        &self,
        id: ObjectId,
        update: &BookingStatusUpdate,
    ) -> Result<UpdateAck, AppError> {
        let mut bookings = self.bookings.write().await;
        Ok(match bookings.iter_mut().find(|b| b.id == id) {
            Some(booking) => update_ack(true, apply_set(booking, update.set_document()?)?),
            None => update_ack(false, false),
        })
    }

    async fn delete_booking(&self, id: ObjectId) -> Result<DeleteAck, AppError> {
        let mut bookings = self.bookings.write().await;
        let before = bookings.len();
        bookings.retain(|b| b.id != id);
        Ok(delete_ack(bookings.len() < before))
    }

    async fn find_comments(&self) -> Result<Vec<Comment>, AppError> {
        Ok(self.comments.read().await.clone())
    }
}
