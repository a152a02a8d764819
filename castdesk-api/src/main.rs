//! # Castdesk API Server
//!
//! REST backend for a casting agency: clients, projects, casting roles,
//! notes, favorites, and fact-sheet approval, behind JWT bearer
//! authentication with role-based route guards.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p castdesk-api
//! ```

use castdesk_api::{app, config::Config};
use castdesk_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "castdesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Castdesk API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    let bind_address = config.bind_address();
    let state = app::AppState::new(db, config);
    let router = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
