pub mod memory;
pub mod mongo;

pub use memory::InMemoryMediaStore;
pub use mongo::MongoMediaStore;

use crate::media::Media;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("media {0} already exists")]
    Duplicate(Uuid),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence operations for media records.
///
/// Implementations must make `apply_rating` atomic per record: concurrent
/// calls against the same id must never lose a submission.
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Insert a new record.
    async fn insert(&self, media: &Media) -> StorageResult<()>;

    /// All records in store order.
    async fn find_all(&self) -> StorageResult<Vec<Media>>;

    /// Look up a record, `None` when absent.
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Media>>;

    /// Fold `rating` into the record's aggregate and return the updated
    /// record, or `None` when no record exists for `id`.
    async fn apply_rating(&self, id: Uuid, rating: f64) -> StorageResult<Option<Media>>;

    /// Number of stored records.
    async fn count(&self) -> StorageResult<u64>;
}
