pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoDB;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::models::{
    BookedService, BookingQuery, BookingStatusUpdate, Comment, DeleteAck, InsertAck, NewBooking,
    NewService, Service, ServiceQuery, ServiceUpdate, UpdateAck,
};
use crate::utils::AppError;

pub const SERVICES: &str = "Services";
pub const BOOKED_SERVICES: &str = "BookedServices";
pub const COMMENTS: &str = "comments";

/// Document store operations used by the handlers. One call, one store round-trip.
#[async_trait]
pub trait Store: Send + Sync {
    /// Round-trip used by the health check
    async fn ping(&self) -> Result<(), AppError>;

    async fn find_services(&self, query: &ServiceQuery) -> Result<Vec<Service>, AppError>;

    async fn find_service(&self, id: ObjectId) -> Result<Option<Service>, AppError>;

    async fn insert_service(&self, service: NewService) -> Result<InsertAck, AppError>;

    async fn update_service(
        &self,
        id: ObjectId,
        update: &ServiceUpdate,
    ) -> Result<UpdateAck, AppError>;

    async fn delete_service(&self, id: ObjectId) -> Result<DeleteAck, AppError>;

    async fn find_bookings(&self, query: &BookingQuery) -> Result<Vec<BookedService>, AppError>;

    async fn insert_booking(&self, booking: NewBooking) -> Result<InsertAck, AppError>;

    async fn update_booking(
        &self,
        id: ObjectId,
        update: &BookingStatusUpdate,
    ) -> Result<UpdateAck, AppError>;

    async fn delete_booking(&self, id: ObjectId) -> Result<DeleteAck, AppError>;

    async fn find_comments(&self) -> Result<Vec<Comment>, AppError>;
}
