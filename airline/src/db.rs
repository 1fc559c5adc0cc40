//! Database pool construction and error mapping.
//!
//! The service runs on `SQLite` through sqlx. Migrations are embedded with
//! [`sqlx::migrate!`] and applied at startup (and by the test harness).

use crate::config::DatabaseConfig;
use airline_web::AppError;
use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Embedded migrations from `airline/migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Build the connection pool described by `config`.
///
/// Foreign keys are enforced on every connection; the database file is
/// created on first run.
///
/// # Errors
///
/// Returns an error if the URL does not parse or the database cannot be
/// opened.
pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("invalid database URL: {}", config.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory database exists per connection. Pin the pool to a single
    // connection that is never recycled, or each checkout would see a fresh
    // empty database.
    let in_memory = config.url.contains(":memory:") || config.url.contains("mode=memory");
    let max_connections = if in_memory { 1 } else { config.max_connections };

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout));
    if in_memory {
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }

    pool_options
        .connect_with(options)
        .await
        .context("failed to open database")
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    MIGRATOR.run(pool).await.context("migration failed")?;
    Ok(())
}

/// Map a sqlx error onto the API error envelope.
///
/// Unique-constraint violations surface as 400 validation errors (the
/// uniqueness rules here, duplicate routes and taken seats, are client
/// mistakes). Everything else is an opaque 500 carrying the source for
/// the log.
pub fn db_error(err: sqlx::Error) -> AppError {
    if err
        .as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
    {
        return AppError::validation("value violates a uniqueness constraint");
    }
    AppError::internal("database error").with_source(err.into())
}
