use media_rating_api::api::{self, AppState};
use media_rating_api::config::{AppConfig, StorageBackend};
use media_rating_api::media::MediaService;
use media_rating_api::storage::{InMemoryMediaStore, MediaRepository, MongoMediaStore};
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Starting Media Rating API Server");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Storage: {}", config.database.backend);
    info!("   - Server: {}", config.bind_address());

    // Initialize media store
    let repository: Arc<dyn MediaRepository> = match config.database.backend {
        StorageBackend::Mongodb => {
            info!("💾 Connecting to MongoDB...");
            let store = MongoMediaStore::connect(
                &config.database.uri,
                &config.database.name,
                &config.database.collection,
                config.database.server_selection_timeout(),
            )
            .await
            .context("MongoDB is unreachable")?;
            Arc::new(store)
        }
        StorageBackend::Memory => {
            warn!("⚠️  Using in-memory storage, data is lost on shutdown");
            Arc::new(InMemoryMediaStore::new())
        }
    };

    let media_service = MediaService::new(repository);
    let media_count = media_service.count().await?;
    info!("✅ Media store ready ({} media)", media_count);

    // Create application state
    let state = AppState { media_service };
    let app = api::router(state);

    // Start server
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET  /health        - Health check");
    info!("   GET  /media         - List media");
    info!("   POST /media         - Create media");
    info!("   GET  /media/{{id}}    - Get media by id");
    info!("   PUT  /media/{{id}}    - Submit a rating");
    info!("");
    info!("✨ Server is ready to accept requests!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
