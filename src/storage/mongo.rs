use super::{MediaRepository, StorageError, StorageResult};
use crate::media::Media;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, ReturnDocument};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// Persisted shape of a media record
#[derive(Debug, Serialize, Deserialize)]
struct MediaDocument {
    #[serde(rename = "_id", with = "bson::serde_helpers::uuid_1_as_binary")]
    id: Uuid,
    title: String,
    #[serde(rename = "releaseYear")]
    release_year: String,
    #[serde(rename = "ratingsCount", default)]
    ratings_count: i64,
    #[serde(rename = "unprocessedRating", default)]
    unprocessed_rating: f64,
    #[serde(rename = "averageRating", default)]
    average_rating: f64,
}

impl From<&Media> for MediaDocument {
    fn from(media: &Media) -> Self {
        Self {
            id: media.id,
            title: media.title.clone(),
            release_year: media.release_year.clone(),
            ratings_count: i64::try_from(media.ratings_count).unwrap_or(i64::MAX),
            unprocessed_rating: media.unprocessed_rating,
            average_rating: media.average_rating,
        }
    }
}

impl From<MediaDocument> for Media {
    fn from(doc: MediaDocument) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            release_year: doc.release_year,
            ratings_count: doc.ratings_count.max(0) as u64,
            unprocessed_rating: doc.unprocessed_rating,
            average_rating: doc.average_rating,
        }
    }
}

const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

fn id_filter(id: Uuid) -> Document {
    doc! { "_id": bson::Uuid::from(id) }
}

/// Aggregation-pipeline update that increments the counters and derives the
/// average from the post-increment values inside one document write.
fn rating_pipeline(rating: f64) -> Vec<Document> {
    vec![
        doc! {
            "$set": {
                "ratingsCount": { "$add": [{ "$ifNull": ["$ratingsCount", 0_i64] }, 1_i64] },
                "unprocessedRating": { "$add": [{ "$ifNull": ["$unprocessedRating", 0.0] }, rating] },
            }
        },
        doc! {
            "$set": {
                "averageRating": { "$divide": ["$unprocessedRating", "$ratingsCount"] },
            }
        },
    ]
}

/// MongoDB-backed media store.
///
/// Owns its client; construct once at startup and share behind an `Arc`.
#[derive(Clone)]
pub struct MongoMediaStore {
    collection: Collection<MediaDocument>,
}

impl MongoMediaStore {
    /// Connect and ping the database, failing if it is unreachable.
    pub async fn connect(
        uri: &str,
        database: &str,
        collection: &str,
        server_selection_timeout: Duration,
    ) -> StorageResult<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.server_selection_timeout = Some(server_selection_timeout);

        let client = Client::with_options(options)?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }).await?;

        info!(database = %database, collection = %collection, "Connected to MongoDB");

        Ok(Self {
            collection: db.collection(collection),
        })
    }
}

#[async_trait]
impl MediaRepository for MongoMediaStore {
    async fn insert(&self, media: &Media) -> StorageResult<()> {
        match self.collection.insert_one(MediaDocument::from(media)).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(StorageError::Duplicate(media.id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_all(&self) -> StorageResult<Vec<Media>> {
        let cursor = self.collection.find(doc! {}).await?;
        let docs: Vec<MediaDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Media::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Media>> {
        let found = self.collection.find_one(id_filter(id)).await?;
        Ok(found.map(Media::from))
    }

    async fn apply_rating(&self, id: Uuid, rating: f64) -> StorageResult<Option<Media>> {
        let updated = self
            .collection
            .find_one_and_update(id_filter(id), rating_pipeline(rating))
            .return_document(ReturnDocument::After)
            .await?;

        if let Some(doc) = &updated {
            debug!(media_id = %id, ratings_count = doc.ratings_count, "Applied rating in MongoDB");
        }

        Ok(updated.map(Media::from))
    }

    async fn count(&self) -> StorageResult<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}
