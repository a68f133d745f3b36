use super::{MediaRepository, StorageError, StorageResult};
use crate::media::Media;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// HashMap-backed media store for development and tests.
///
/// Rating submissions are folded in while the write lock is held, which
/// serializes concurrent updates of the same record.
#[derive(Clone, Default)]
pub struct InMemoryMediaStore {
    records: Arc<RwLock<HashMap<Uuid, Media>>>,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaRepository for InMemoryMediaStore {
    async fn insert(&self, media: &Media) -> StorageResult<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&media.id) {
            return Err(StorageError::Duplicate(media.id));
        }
        records.insert(media.id, media.clone());
        Ok(())
    }

    async fn find_all(&self) -> StorageResult<Vec<Media>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Media>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn apply_rating(&self, id: Uuid, rating: f64) -> StorageResult<Option<Media>> {
        let mut records = self.records.write().await;
        let Some(media) = records.get_mut(&id) else {
            return Ok(None);
        };

        let next = media.aggregate().apply(rating);
        debug_assert!(next.is_consistent());
        media.set_aggregate(next);
        debug!(media_id = %id, ratings_count = next.ratings_count, "Applied rating in memory");

        Ok(Some(media.clone()))
    }

    async fn count(&self) -> StorageResult<u64> {
        Ok(self.records.read().await.len() as u64)
    }
}
