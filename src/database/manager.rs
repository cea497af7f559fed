use sqlx::migrate::{MigrateError, Migrator};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Embedded `migrations/*.up.sql` / `*.down.sql` pairs
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Migration error: {0}")]
    Migration(#[from] MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Builds the connection pool and applies schema migrations
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool against `DATABASE_URL`
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let target = Self::redacted_url(&config.url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        info!("Created database pool for: {}", target);
        Ok(pool)
    }

    /// Apply every pending up migration
    pub async fn migrate_up(pool: &PgPool) -> Result<(), DatabaseError> {
        MIGRATOR.run(pool).await?;
        info!("Database schema is up to date");
        Ok(())
    }

    /// Revert applied migrations down to (and excluding) `target` version; 0 reverts all
    pub async fn migrate_down(pool: &PgPool, target: i64) -> Result<(), DatabaseError> {
        MIGRATOR.undo(pool, target).await?;
        info!("Reverted migrations down to version {}", target);
        Ok(())
    }

    /// Connection string with the password removed, for logging
    fn redacted_url(database_url: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(database_url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if url.password().is_some() {
            url.set_password(Some("****"))
                .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(pool: PgPool) {
        pool.close().await;
        info!("Closed database pool");
    }
}
