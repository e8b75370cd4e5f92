//! Markdown Generator
//!
//! HTTP service that renders markdown documents and serves them from
//! expiring download links.

use std::net::SocketAddr;

use anyhow::Context;
use mdgen::{api, config, AppState, Result};
use mdgen_storage::RetentionSweeper;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mdgen=debug,mdgen_storage=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::init();
    tracing::info!(
        "Starting markdown generator on {}:{}",
        config.server.host,
        config.server.port
    );

    // Initialize application state
    let state = AppState::new(config).await?;
    tracing::info!(
        export_dir = %config.storage.export_dir.display(),
        retention_secs = config.storage.retention_seconds,
        "Application state initialized"
    );

    // Initialize startup time for uptime tracking
    api::status::init_startup_time();

    // Start retention sweeper
    let sweeper = RetentionSweeper::new(state.store.clone(), config.sweep_interval()).start();

    let app = api::app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid HOST/PORT")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.stop().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
