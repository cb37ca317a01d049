//! Typed error type for the db crate.
//!
//! An empty result is never an error: lookups return `Ok(None)` and list
//! queries return an empty `Vec`. Everything in here means the operation
//! itself did not complete.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A required field was absent or empty; nothing was sent to the database.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid fixture: {0}")]
    Fixture(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
