//! MOT Proxy - a vehicle MOT history lookup service
//!
//! Proxies registration-plate lookups to the DVSA vehicle-history API,
//! caching results and the OAuth2 bearer token used to reach it.

mod api;
mod cache;
mod config;
mod error;
mod mapper;
mod models;
mod registration;
mod service;
mod tasks;
mod token;
mod upstream;

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use tasks::spawn_cleanup_task;

/// Main entry point for the MOT lookup proxy.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables (DVSA credentials are
///    required; missing values abort startup)
/// 3. Build the lookup proxy (HTTP clients, token manager, result cache)
/// 4. Start the background TTL sweep task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mot_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MOT lookup proxy");

    // Load configuration; missing DVSA credentials are fatal here
    let config = Config::from_env().context("configuration error")?;
    info!(
        "Configuration loaded: port={}, cleanup_interval={}s, http_timeout={}s",
        config.server_port, config.cleanup_interval, config.http_timeout
    );

    // Build the lookup proxy and shared state
    let state = AppState::from_config(&config).context("failed to build lookup proxy")?;
    info!("Lookup proxy initialized");

    // Start background sweep task
    let cleanup_handle = spawn_cleanup_task(state.proxy.clone(), config.cleanup_interval);
    info!("Background TTL sweep task started");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Abort the sweep task
    cleanup_handle.abort();
    warn!("TTL sweep task aborted");
}
