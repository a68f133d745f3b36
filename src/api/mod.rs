pub mod media;
pub mod models;

// Re-exports
pub use models::*;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

// Health handler (simple, keep here)
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<models::HealthResponse>) {
    let (status, health, total_media) = match state.media_service.count().await {
        Ok(total) => (StatusCode::OK, "healthy", total),
        Err(e) => {
            error!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", 0)
        }
    };

    (status, Json(models::HealthResponse {
        status: health.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        total_media,
    }))
}

/// Full application router with tracing and CORS layers
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(media::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
