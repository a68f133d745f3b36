use crate::api::media::handlers::*;
use crate::api::models::AppState;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/media", get(list_media_handler).post(create_media_handler))
        .route("/media/{id}", get(get_media_handler).put(submit_rating_handler))
}
