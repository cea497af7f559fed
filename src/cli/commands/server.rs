use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use crate::config::{AppConfig, OwnershipPolicy};
use crate::database::{DatabaseManager, PgQuerier};
use crate::router::app;
use crate::state::AppState;

/// Connect, migrate if configured, and serve until Ctrl-C
pub async fn handle() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting blog API in {:?} mode", config.environment);

    if !config.security.require_auth {
        tracing::warn!("SECURITY_REQUIRE_AUTH=false: post mutations accept unauthenticated callers");
    }
    if config.security.ownership_policy == OwnershipPolicy::Unchecked {
        tracing::warn!("SECURITY_OWNERSHIP_POLICY=unchecked: any caller may edit or delete any post");
    }

    let pool = DatabaseManager::connect(&config.database).await?;
    if config.database.run_migrations {
        DatabaseManager::migrate_up(&pool).await?;
    }

    let bind_addr = config.listen_addr();
    let state = AppState::new(Arc::new(PgQuerier::new(pool.clone())), config);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Blog API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    DatabaseManager::close(pool).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
