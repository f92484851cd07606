//! pairing-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use pairing_gateway::app_state::AppState;
use pairing_gateway::config::{GatewayConfig, LogFormat};
use pairing_gateway::persistence::Store;
use pairing_gateway::persistence::memory::InMemoryStore;
use pairing_gateway::persistence::postgres::PostgresStore;
use pairing_gateway::server::build_app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(
        addr = %config.listen_addr,
        policy = ?config.match_policy,
        persistence = config.persistence_enabled,
        "starting pairing-gateway"
    );

    // Build persistence layer
    let store: Arc<dyn Store> = if config.persistence_enabled {
        let store = PostgresStore::connect(&config)
            .await
            .context("connecting to PostgreSQL")?;
        store.init_schema().await.context("initializing schema")?;
        Arc::new(store)
    } else {
        tracing::warn!("persistence disabled, chat history and profiles are kept in memory");
        Arc::new(InMemoryStore::new())
    };

    // Build application state and router
    let app_state = AppState::new(store, &config);
    let app = build_app(app_state, &config);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
