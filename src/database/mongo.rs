use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

use super::{Store, BOOKED_SERVICES, COMMENTS, SERVICES};
use crate::api::patch::Whitelist;
use crate::models::{
    BookedService, BookingQuery, BookingStatusUpdate, Comment, DeleteAck, InsertAck, NewBooking,
    NewService, Service, ServiceQuery, ServiceUpdate, UpdateAck,
};
use crate::utils::AppError;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> mongodb::error::Result<Self> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));
        client_options.app_name = Some("electrosavvy-server".to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.run_command(doc! { "ping": 1 }).await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Creates the indexes behind the email-scoped listings
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let indexes = [
            (SERVICES, "serviceProviderEmail"),
            (BOOKED_SERVICES, "currentUserEmail"),
            (BOOKED_SERVICES, "serviceProviderEmail"),
        ];

        for (collection, field) in indexes {
            let mut keys = Document::new();
            keys.insert(field, 1);
            let model = IndexModel::builder().keys(keys).build();
            match self.collection::<Document>(collection).create_index(model).await {
                Ok(_) => log::info!("   ✅ Index ready: {}({})", collection, field),
                Err(e) => log::warn!("   ⚠️  Index {}({}) not created: {}", collection, field, e),
            }
        }
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

fn service_filter(query: &ServiceQuery) -> Document {
    let mut filter = Document::new();
    if let Some(term) = &query.name_contains {
        // Literal substring, not a user-supplied pattern
        filter.insert(
            "serviceName",
            doc! { "$regex": regex::escape(term), "$options": "i" },
        );
    }
    if let Some(email) = &query.provider_email {
        filter.insert("serviceProviderEmail", email);
    }
    filter
}

fn booking_filter(query: &BookingQuery) -> Document {
    match query {
        BookingQuery::Customer(email) => doc! { "currentUserEmail": email },
        BookingQuery::Provider(email) => doc! { "serviceProviderEmail": email },
    }
}

#[async_trait]
impl Store for MongoDB {
    async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn find_services(&self, query: &ServiceQuery) -> Result<Vec<Service>, AppError> {
        let collection = self.collection::<Service>(SERVICES);
        let mut find = collection.find(service_filter(query));
        if let Some(limit) = query.limit {
            find = find.limit(limit);
        }
        let cursor = find.await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_service(&self, id: ObjectId) -> Result<Option<Service>, AppError> {
        Ok(self
            .collection::<Service>(SERVICES)
            .find_one(doc! { "_id": id })
            .await?)
    }

    async fn insert_service(&self, service: NewService) -> Result<InsertAck, AppError> {
        let result = self
            .collection::<NewService>(SERVICES)
            .insert_one(&service)
            .await?;
        Ok(result.into())
    }

    async fn update_service(
        &self,
        id: ObjectId,
        update: &ServiceUpdate,
    ) -> Result<UpdateAck, AppError> {
        let result = self
            .collection::<Document>(SERVICES)
            .update_one(doc! { "_id": id }, doc! { "$set": update.set_document()? })
            .await?;
        Ok(result.into())
    }

    async fn delete_service(&self, id: ObjectId) -> Result<DeleteAck, AppError> {
        let result = self
            .collection::<Document>(SERVICES)
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(result.into())
    }

    async fn find_bookings(&self, query: &BookingQuery) -> Result<Vec<BookedService>, AppError> {
        let cursor = self
            .collection::<BookedService>(BOOKED_SERVICES)
            .find(booking_filter(query))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_booking(&self, booking: NewBooking) -> Result<InsertAck, AppError> {
        let result = self
            .collection::<NewBooking>(BOOKED_SERVICES)
            .insert_one(&booking)
            .await?;
        Ok(result.into())
    }

    async fn update_booking(
        &self,
        id: ObjectId,
        update: &BookingStatusUpdate,
    ) -> Result<UpdateAck, AppError> {
        let result = self
            .collection::<Document>(BOOKED_SERVICES)
            .update_one(doc! { "_id": id }, doc! { "$set": update.set_document()? })
            .await?;
        Ok(result.into())
    }

    async fn delete_booking(&self, id: ObjectId) -> Result<DeleteAck, AppError> {
        let result = self
            .collection::<Document>(BOOKED_SERVICES)
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(result.into())
    }

    async fn find_comments(&self) -> Result<Vec<Comment>, AppError> {
        let cursor = self.collection::<Comment>(COMMENTS).find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term_is_escaped() {
        let filter = service_filter(&ServiceQuery::search(Some("a.c (fan)".into())));
        let regex = filter.get_document("serviceName").unwrap();
        assert_eq!(regex.get_str("$regex").unwrap(), r"a\.c \(fan\)");
        assert_eq!(regex.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_empty_query_has_empty_filter() {
        assert!(service_filter(&ServiceQuery::default()).is_empty());
    }

    #[test]
    fn test_booking_filter_fields() {
        assert_eq!(
            booking_filter(&BookingQuery::Provider("pro@x.com".into())),
            doc! { "serviceProviderEmail": "pro@x.com" }
        );
        assert_eq!(
            booking_filter(&BookingQuery::Customer("me@x.com".into())),
            doc! { "currentUserEmail": "me@x.com" }
        );
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let db = MongoDB::new(&uri, "ElectroSavvyTest").await.unwrap();
        assert!(db.ping().await.is_ok());
    }
}
