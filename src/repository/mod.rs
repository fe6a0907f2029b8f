pub mod content_repository;
pub mod memory_store;
pub mod mongo_store;
pub mod record_store;

pub use content_repository::{Record, Repository};
pub use memory_store::MemoryStore;
pub use mongo_store::MongoStore;
pub use record_store::{RecordStore, StoreError, StoreResult};
