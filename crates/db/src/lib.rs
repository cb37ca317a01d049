//! `db` crate: the LightBnB data access layer.
//!
//! Provides connection settings, an explicitly managed connection pool,
//! typed row structs, and repository functions for users, properties and
//! reservations. Callers open the pool once and pass it to every function.

pub mod config;
pub mod error;
pub mod fixtures;
pub mod models;
pub mod pool;
pub mod query;
pub mod repository;

pub use config::DbConfig;
pub use error::DbError;
pub use pool::DbPool;
pub use repository::properties::PropertyFilter;
