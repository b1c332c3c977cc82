// Vocalis - pronunciation service over eSpeak NG

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use vocalis_core::ServiceConfig;
use vocalis_server::http::{create_router, ApiState};
use vocalis_spk::{EspeakEngine, PronunciationService, SpeechEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    info!("Starting vocalis...");

    let config = ServiceConfig::from_env()?;

    let engine: Arc<dyn SpeechEngine> = Arc::new(EspeakEngine::new(&config));
    if !engine.is_available() {
        warn!(
            "eSpeak NG not found at {}; install it or set VOCALIS_ESPEAK_PATH",
            config.espeak_path.display()
        );
    }

    let port = config.http_port;
    let service = Arc::new(PronunciationService::new(config, engine));
    let router = create_router(ApiState { service });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP API listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal
async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
