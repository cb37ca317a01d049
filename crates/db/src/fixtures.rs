//! Loading seed data from JSON fixture files.
//!
//! A fixture file is either a JSON array of records or an object keyed by
//! numeric id (`{ "1": {...}, "2": {...} }`). Keyed files are loaded in
//! ascending id order; any `id` field inside a record is ignored because
//! the database assigns ids on insert.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::{
    DbError,
    models::{NewProperty, NewUser},
    repository::{properties, users},
};

#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureSet<T> {
    List(Vec<T>),
    Keyed(BTreeMap<String, T>),
}

impl<T> FixtureSet<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::List(items) => items,
            Self::Keyed(map) => {
                let mut entries: Vec<(String, T)> = map.into_iter().collect();
                entries.sort_by_key(|(key, _)| key.parse::<i64>().ok());
                entries.into_iter().map(|(_, item)| item).collect()
            }
        }
    }
}

/// Parse fixture records from a JSON string.
pub fn parse_fixture<T: DeserializeOwned>(json: &str) -> Result<Vec<T>, DbError> {
    let set: FixtureSet<T> = serde_json::from_str(json)?;
    Ok(set.into_vec())
}

/// Read and parse a fixture file.
pub async fn load_fixture<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DbError> {
    let json = tokio::fs::read_to_string(path).await?;
    parse_fixture(&json)
}

/// How many rows a [`seed`] run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub properties: usize,
}

/// Insert `new_users` and then `new_properties`, one statement each.
///
/// Users go first so that properties can reference them by `owner_id`.
/// There is no enclosing transaction: on error, rows inserted before the
/// failing one stay in place.
pub async fn seed(
    pool: &PgPool,
    new_users: &[NewUser],
    new_properties: &[NewProperty],
) -> Result<SeedReport, DbError> {
    let mut report = SeedReport::default();

    for user in new_users {
        users::add_user(pool, user).await?;
        report.users += 1;
    }
    for property in new_properties {
        properties::add_property(pool, property).await?;
        report.properties += 1;
    }

    info!(users = report.users, properties = report.properties, "Seeded database");
    Ok(report)
}
