//! Roadmap Server binary.

use std::net::SocketAddr;
use std::time::Duration;

use auth::{AUTHORIZATION_STATE_MAX_AGE_SECS, AuthStateStore};
use roadmap_server::{config::Config, create_app, create_state, init_tracing};
use roadmap_store::{MemoryRoadmapStore, RoadmapStore, SqliteRoadmapStore};
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        oauth_configured = config.oauth_configured(),
        summaries_enabled = config.summaries_enabled(),
        "Starting Roadmap Server"
    );

    match config.database_url.clone() {
        Some(url) => {
            let store = SqliteRoadmapStore::connect(&url).await?;
            tracing::info!("Using SQLite roadmap store");
            serve(config, store).await
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory roadmap store");
            serve(config, MemoryRoadmapStore::new()).await
        }
    }
}

async fn serve<S: RoadmapStore + 'static>(config: Config, store: S) -> anyhow::Result<()> {
    let addr: SocketAddr = config.server_addr().parse()?;

    let state = create_state(config, store);
    let app = create_app(state.clone());

    // Expire abandoned login attempts
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            match cleanup_state
                .auth_state_store
                .cleanup_expired(AUTHORIZATION_STATE_MAX_AGE_SECS)
                .await
            {
                Ok(0) => {}
                Ok(count) => tracing::debug!(count, "Cleaned up expired login states"),
                Err(e) => tracing::warn!(error = %e, "Failed to clean up login states"),
            }
        }
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, shutting down");
        }
    }
}
