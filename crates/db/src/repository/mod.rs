//! Repository functions: one function per database operation.
//!
//! Every function takes a `&DbPool` and returns a `Result<T, DbError>`.
//! Single-row lookups return `Ok(None)` when nothing matches and list
//! queries return an empty `Vec`; `Err` always means the query failed.

pub mod properties;
pub mod reservations;
pub mod users;
