use crate::api::models::*;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use tracing::{info, warn};

pub async fn list_media_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<MediaResponse>>, AppError> {
    let media = state.media_service.list().await?;

    info!(count = media.len(), "Listed media");

    Ok(Json(media.into_iter().map(MediaResponse::from).collect()))
}

pub async fn create_media_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateMediaRequest>, JsonRejection>,
) -> Result<Json<MediaResponse>, AppError> {
    let Json(request) = payload?;

    let media = state.media_service.create(request.into()).await?;

    Ok(Json(media.into()))
}

pub async fn get_media_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MediaResponse>, AppError> {
    let media = state.media_service.get_by_id(&id).await?;

    Ok(Json(media.into()))
}

pub async fn submit_rating_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SubmitRatingRequest>, JsonRejection>,
) -> Result<Json<MediaResponse>, AppError> {
    let Json(request) = payload?;

    let media = state
        .media_service
        .submit_rating(&id, request.media_rating)
        .await
        .inspect_err(|e| warn!(media_id = %id, error = %e, "Rating rejected"))?;

    Ok(Json(media.into()))
}
