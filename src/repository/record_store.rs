use mongodb::bson::{self, Document};
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("failed to encode record: {0}")]
    Encode(#[from] bson::ser::Error),

    #[error("stored record does not match its schema: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("unsupported store operation: {0}")]
    Unsupported(String),
}

/// Schemaless document storage, addressed by collection name.
///
/// Filters, sorts and update documents use MongoDB query syntax. Update
/// documents must be operator documents (`$set`, `$inc`).
#[rocket::async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, collection: &str, record: Document) -> StoreResult<()>;

    async fn find_one(&self, collection: &str, filter: Document) -> StoreResult<Option<Document>>;

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<Document>,
    ) -> StoreResult<Vec<Document>>;

    /// Returns the number of matched records (0 or 1).
    async fn update_one(&self, collection: &str, filter: Document, update: Document)
        -> StoreResult<u64>;

    /// Returns the number of deleted records (0 or 1).
    async fn delete_one(&self, collection: &str, filter: Document) -> StoreResult<u64>;

    async fn count(&self, collection: &str, filter: Document) -> StoreResult<u64>;

    async fn shutdown(&self) {}
}
