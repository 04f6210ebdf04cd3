//! Sagaflow API server entry point.

use std::error::Error;
use std::sync::Arc;

use sagaflow_api::config::ServerConfig;
use sagaflow_api::state::AppState;
use sagaflow_core::clock::SystemClock;
use sagaflow_core::journal::EventJournal;
use sagaflow_playback::application::controller::PlaybackController;
use sagaflow_playback::infrastructure::in_memory_journal::InMemoryEventJournal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Sagaflow API server");

    let config = ServerConfig::from_env()?;

    let journal: Arc<dyn EventJournal> = Arc::new(InMemoryEventJournal::new());
    let controller =
        PlaybackController::spawn(config.playback, Arc::new(SystemClock), journal.clone());
    tracing::info!(
        session_id = %controller.session_id(),
        time_scale = config.playback.time_scale(),
        "playback controller ready"
    );

    // Demo surface; any origin may drive the player.
    let app = sagaflow_api::build_router(AppState::new(controller, journal))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
