//! # TaskGraph API Server
//!
//! Session-authenticated GraphQL API over MongoDB for users, projects, and
//! tasks.
//!
//! ## Architecture
//!
//! The server is built with Axum and provides:
//! - A GraphQL endpoint (`POST /graphql`) with a playground on GET
//! - Cookie-session authentication (login/logout mutations)
//! - Ownership-scoped project and task operations
//! - A health check endpoint (`GET /health`)
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskgraph-api
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskgraph_api::app::{build_router, AppState};
use taskgraph_api::config::Config;
use taskgraph_shared::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskgraph_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskGraph API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let store = Store::connect(&config.mongodb.uri, &config.mongodb.database).await?;
    store.ping().await?;
    tracing::info!(database = %config.mongodb.database, "Connected to MongoDB");

    let addr = config.bind_address();
    let state = AppState::new(store, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Resolves when the process receives a shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining...");
}
