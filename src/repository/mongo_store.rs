use futures::stream::TryStreamExt;
use mongodb::bson::Document;
use mongodb::options::FindOptions;
use mongodb::{Client, Database};

use super::record_store::{RecordStore, StoreResult};

/// `RecordStore` backed by a MongoDB database. The driver's client carries
/// its own connection pool, so one instance is shared by every request.
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    pub fn new(client: Client, db_name: &str) -> Self {
        let db = client.database(db_name);
        MongoStore { client, db }
    }
}

#[rocket::async_trait]
impl RecordStore for MongoStore {
    async fn insert(&self, collection: &str, record: Document) -> StoreResult<()> {
        self.db
            .collection::<Document>(collection)
            .insert_one(record, None)
            .await?;
        Ok(())
    }

    async fn find_one(&self, collection: &str, filter: Document) -> StoreResult<Option<Document>> {
        let record = self
            .db
            .collection::<Document>(collection)
            .find_one(filter, None)
            .await?;
        Ok(record)
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<Document>,
    ) -> StoreResult<Vec<Document>> {
        let mut options = FindOptions::default();
        options.sort = sort;

        let cursor = self
            .db
            .collection::<Document>(collection)
            .find(filter, options)
            .await?;
        let records: Vec<Document> = cursor.try_collect().await?;
        Ok(records)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> StoreResult<u64> {
        let result = self
            .db
            .collection::<Document>(collection)
            .update_one(filter, update, None)
            .await?;
        Ok(result.matched_count)
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> StoreResult<u64> {
        let result = self
            .db
            .collection::<Document>(collection)
            .delete_one(filter, None)
            .await?;
        Ok(result.deleted_count)
    }

    async fn count(&self, collection: &str, filter: Document) -> StoreResult<u64> {
        let count = self
            .db
            .collection::<Document>(collection)
            .count_documents(filter, None)
            .await?;
        Ok(count)
    }

    async fn shutdown(&self) {
        self.client.clone().shutdown().await;
    }
}
