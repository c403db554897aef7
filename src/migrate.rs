//! Database migration utilities

use sqlx::{SqlitePool, migrate::MigrateDatabase, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use std::str::FromStr;

use crate::config::Config;

/// Creates the database when missing and applies every pending migration.
pub async fn migrate(config: &Config) -> anyhow::Result<()> {
    let options = SqliteConnectOptions::from_str(&config.database.url)?.create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;

    run_migrations(&pool).await?;
    pool.close().await;

    tracing::info!(url = %config.database.url, "Database migrated");

    Ok(())
}

/// Drops the database if it exists and migrates a fresh one.
pub async fn reset(config: &Config) -> anyhow::Result<()> {
    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!(url = %config.database.url, "Dropping database");
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate(config).await
}

pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    let mut conn = pool.acquire().await?;
    cannabot_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(())
}
