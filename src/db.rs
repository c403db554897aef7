use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use std::str::FromStr;
use tracing::log::LevelFilter;

const PRAGMAS: &[&str] = &[
    "PRAGMA journal_mode = WAL",
    "PRAGMA busy_timeout = 5000",
    "PRAGMA synchronous = NORMAL",
    "PRAGMA cache_size = -20000",
    "PRAGMA foreign_keys = true",
    "PRAGMA temp_store = memory",
];

async fn configure_pragmas(pool: &SqlitePool) -> Result<()> {
    for pragma in PRAGMAS {
        sqlx::query(pragma).execute(pool).await?;
    }

    Ok(())
}

async fn connect(database_url: &str, read_only: bool, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .read_only(read_only)
        .log_statements(LevelFilter::Debug);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    configure_pragmas(&pool).await?;

    tracing::info!(read_only, max_connections, "Created database pool");

    Ok(pool)
}

/// Read-only pool for queries, sized for concurrent readers.
pub async fn create_read_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    connect(database_url, true, max_connections).await
}

/// Single connection pool carrying every write and transaction.
pub async fn create_write_pool(database_url: &str) -> Result<SqlitePool> {
    connect(database_url, false, 1).await
}

/// Read-write pool for CLI commands where separation is not needed.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    connect(database_url, false, max_connections).await
}
