use super::aggregate::validate_rating;
use super::{parse_media_id, Media, MediaError, MediaResult, NewMedia};
use crate::storage::MediaRepository;
use std::sync::Arc;
use tracing::info;

/// Media operations over an injected repository
#[derive(Clone)]
pub struct MediaService {
    repository: Arc<dyn MediaRepository>,
}

impl MediaService {
    pub fn new(repository: Arc<dyn MediaRepository>) -> Self {
        Self { repository }
    }

    /// Store a new media item with a fresh id and an empty aggregate
    pub async fn create(&self, input: NewMedia) -> MediaResult<Media> {
        let media = Media::create(input);
        self.repository.insert(&media).await?;

        info!(media_id = %media.id, title = %media.title, "Media created");
        Ok(media)
    }

    pub async fn list(&self) -> MediaResult<Vec<Media>> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn get_by_id(&self, raw_id: &str) -> MediaResult<Media> {
        let id = parse_media_id(raw_id)?;
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(MediaError::NotFound(id))
    }

    /// Fold one rating into a record's aggregate.
    ///
    /// The rating and id are validated before the store is touched, so a
    /// rejected submission leaves the record as it was.
    pub async fn submit_rating(&self, raw_id: &str, rating: f64) -> MediaResult<Media> {
        let rating = validate_rating(rating)?;
        let id = parse_media_id(raw_id)?;

        let media = self
            .repository
            .apply_rating(id, rating)
            .await?
            .ok_or(MediaError::NotFound(id))?;

        info!(
            media_id = %id,
            rating,
            ratings_count = media.ratings_count,
            average = media.average_rating,
            "Rating applied"
        );
        Ok(media)
    }

    pub async fn count(&self) -> MediaResult<u64> {
        Ok(self.repository.count().await?)
    }
}
