use crate::config::AppConfig;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),
    #[error("Invalid database URL: {0}")]
    InvalidUrl(String),
}

/// Open the SQLite pool with WAL journaling and a busy timeout.
pub async fn create_pool(config: &AppConfig) -> Result<SqlitePool, DatabaseError> {
    info!(target: "database", "Initializing database connection pool");

    let connect_options = SqliteConnectOptions::from_str(&config.database.url)
        .map_err(|e| DatabaseError::InvalidUrl(e.to_string()))?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(connect_options)
        .await?;

    info!(
        target: "database",
        max_connections = config.database.max_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

/// Open the pool and make sure the share schema is present.
pub async fn initialize_database(config: &AppConfig) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(config).await?;

    ensure_schema(&pool).await?;

    info!(target: "database", "Database initialization completed successfully");

    Ok(pool)
}

/// Create the shares table and its lookup index when missing.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shares (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            download_uuid TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_shares_download_uuid ON shares(download_uuid)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
