use std::marker::PhantomData;
use std::sync::Arc;

use mongodb::bson::{self, doc, Document};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::record_store::{RecordStore, StoreResult};

/// A typed record living in one named collection.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;
    /// Human-readable name used in error messages ("Project not found").
    const LABEL: &'static str;
    /// Field used by `fetch` routes; everything else addresses records by `id`.
    const LOOKUP_FIELD: &'static str = "id";

    fn id(&self) -> &str;

    fn sort() -> Option<Document> {
        None
    }
}

/// Typed view of one collection. Records are decoded into `T` at this
/// boundary, so a stored document that does not fit the schema surfaces as a
/// `StoreError::Decode` instead of leaking through.
pub struct Repository<T> {
    store: Arc<dyn RecordStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Repository<T> {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Repository {
            store,
            _record: PhantomData,
        }
    }

    pub async fn create(&self, record: &T) -> StoreResult<()> {
        let document = bson::to_document(record)?;
        self.store.insert(T::COLLECTION, document).await
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<T>> {
        self.find_one(doc! { "id": id }).await
    }

    pub async fn lookup(&self, key: &str) -> StoreResult<Option<T>> {
        let mut filter = Document::new();
        filter.insert(T::LOOKUP_FIELD, key);
        self.find_one(filter).await
    }

    pub async fn find_one(&self, filter: Document) -> StoreResult<Option<T>> {
        match self.store.find_one(T::COLLECTION, filter).await? {
            Some(document) => Ok(Some(bson::from_document(document)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, filter: Document) -> StoreResult<Vec<T>> {
        self.list_sorted(filter, T::sort()).await
    }

    pub async fn list_sorted(&self, filter: Document, sort: Option<Document>) -> StoreResult<Vec<T>> {
        let documents = self.store.find(T::COLLECTION, filter, sort).await?;
        documents
            .into_iter()
            .map(|document| bson::from_document::<T>(document).map_err(Into::into))
            .collect()
    }

    pub async fn exists(&self, filter: Document) -> StoreResult<bool> {
        Ok(self.store.count(T::COLLECTION, filter).await? > 0)
    }

    pub async fn count(&self, filter: Document) -> StoreResult<u64> {
        self.store.count(T::COLLECTION, filter).await
    }

    /// Applies `$set` with `fields` and returns the updated record, or `None`
    /// when no record has this id.
    pub async fn set_fields(&self, id: &str, fields: Document) -> StoreResult<Option<T>> {
        self.update(id, doc! { "$set": fields }).await
    }

    pub async fn update(&self, id: &str, update: Document) -> StoreResult<Option<T>> {
        let matched = self
            .store
            .update_one(T::COLLECTION, doc! { "id": id }, update)
            .await?;
        if matched == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let deleted = self.store.delete_one(T::COLLECTION, doc! { "id": id }).await?;
        Ok(deleted > 0)
    }
}
