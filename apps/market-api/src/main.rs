//! # MediMart Market API Server
//!
//! HTTP server for the medicine marketplace.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Market API Server                                │
//! │                                                                         │
//! │  Clients ───► HTTP/JSON (8080) ───► Handlers ───► SQLite               │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │              Bearer JWT check                                           │
//! │          (external identity provider)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use medimart_api::config::ApiConfig;
use medimart_api::{build_app, AppState};
use medimart_db::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting MediMart market API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        bind_addr = %config.bind_addr,
        database = %config.database_path,
        strict_transitions = config.strict_transitions,
        "Configuration loaded"
    );

    // Connect to SQLite and apply migrations
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Database ready");

    // Create shared state and the router
    let state = AppState::new(db, &config);
    let app = build_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
