pub mod aggregate;
pub mod service;

pub use aggregate::{RatingAggregate, MAX_RATING, MIN_RATING};
pub use service::MediaService;

use crate::storage::StorageError;
use thiserror::Error;
use uuid::Uuid;

/// A media item together with its rating aggregate
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    pub id: Uuid,
    pub title: String,
    pub release_year: String,
    pub ratings_count: u64,
    pub unprocessed_rating: f64,
    pub average_rating: f64,
}

/// Caller-supplied fields of a media item to be created
#[derive(Debug, Clone)]
pub struct NewMedia {
    pub title: String,
    pub release_year: String,
}

impl Media {
    /// Build a fresh record with a new id and an empty aggregate
    pub fn create(input: NewMedia) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            release_year: input.release_year,
            ratings_count: 0,
            unprocessed_rating: 0.0,
            average_rating: 0.0,
        }
    }

    pub fn aggregate(&self) -> RatingAggregate {
        RatingAggregate {
            ratings_count: self.ratings_count,
            unprocessed_rating: self.unprocessed_rating,
            average_rating: self.average_rating,
        }
    }

    /// Overwrite the aggregate fields, leaving id, title and year alone
    pub fn set_aggregate(&mut self, aggregate: RatingAggregate) {
        self.ratings_count = aggregate.ratings_count;
        self.unprocessed_rating = aggregate.unprocessed_rating;
        self.average_rating = aggregate.average_rating;
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("media {0} not found")]
    NotFound(Uuid),

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

pub type MediaResult<T> = Result<T, MediaError>;

/// Parse a path identifier into a media id
pub fn parse_media_id(raw: &str) -> MediaResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| MediaError::InvalidArgument("id is not a UUID".to_string()))
}
