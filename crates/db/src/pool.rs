//! Postgres connection pool.
//!
//! The pool is opened once by the caller, handed to every repository
//! function by reference, and closed explicitly on shutdown.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::{DbConfig, DbError};

/// Type alias for the shared Postgres pool used across the whole application.
pub type DbPool = PgPool;

/// Create a new connection pool from `config`.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, DbError> {
    info!(
        host = %config.host,
        database = %config.database,
        "Connecting to database (max_connections={})",
        config.max_connections
    );
    let pool = pool_options(config)
        .connect_with(config.connect_options())
        .await?;
    Ok(pool)
}

/// Create a pool from a full `postgres://` URL, using `config` only for the
/// pool sizing knobs.
pub async fn create_pool_from_url(database_url: &str, config: &DbConfig) -> Result<DbPool, DbError> {
    info!("Connecting to database (max_connections={})", config.max_connections);
    let pool = pool_options(config).connect(database_url).await?;
    Ok(pool)
}

fn pool_options(config: &DbConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
}

/// Run embedded SQLx migrations located in `./migrations` (relative to the
/// workspace root at build time).
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbError> {
    info!("Running database migrations");
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Wait for in-flight queries to finish and close every connection.
pub async fn close_pool(pool: DbPool) {
    info!("Closing database pool");
    pool.close().await;
}
