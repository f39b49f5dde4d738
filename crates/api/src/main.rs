use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use guestlist_api::config::ServerConfig;
use guestlist_api::lookup::PoolLookup;
use guestlist_api::router::build_app_router;
use guestlist_api::state::AppState;
use guestlist_db::DbConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guestlist_api=debug,guestlist_db=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let db_config = DbConfig::from_env()?;

    let pool = guestlist_db::create_pool(&db_config)
        .await
        .context("Failed to connect to database")?;
    tracing::info!(table = %db_config.table, "Database connection pool created");

    let lookup = PoolLookup::new(pool, db_config.table.clone());
    let addr = SocketAddr::new(config.host.parse().context("Invalid HOST")?, config.port);
    let app = build_app_router(AppState::new(Arc::new(lookup), config));

    tracing::info!("Starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
