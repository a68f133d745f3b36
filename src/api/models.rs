use crate::media::{Media, MediaError, MediaService, NewMedia};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub media_service: MediaService,
}

/// Request to create a media item
///
/// Any `id` or aggregate fields sent by the caller are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMediaRequest {
    pub media_title: String,

    #[serde(default)]
    pub media_release_year: Option<String>,
}

impl From<CreateMediaRequest> for NewMedia {
    fn from(request: CreateMediaRequest) -> Self {
        Self {
            title: request.media_title,
            release_year: request.media_release_year.unwrap_or_default(),
        }
    }
}

/// Request to submit one rating
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingRequest {
    pub media_rating: f64,
}

/// Media item as exposed over HTTP.
///
/// The running sum and count stay internal; `mediaAverageRating` is `0`
/// until the first rating arrives.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    pub id: Uuid,
    pub media_title: String,
    pub media_release_year: String,
    pub media_average_rating: f64,
}

impl From<Media> for MediaResponse {
    fn from(media: Media) -> Self {
        let media_average_rating = media.aggregate().average().unwrap_or(0.0);
        Self {
            id: media.id,
            media_title: media.title,
            media_release_year: media.release_year,
            media_average_rating,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub total_media: u64,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::InvalidArgument(msg) => AppError::BadRequest(msg),
            MediaError::NotFound(_) => AppError::NotFound("media not found".to_string()),
            MediaError::Storage(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(reason = %rejection.body_text(), "Rejected request body");
        AppError::BadRequest("malformed JSON in request body".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse {
            error: status.to_string(),
            message,
        }))
        .into_response()
    }
}
