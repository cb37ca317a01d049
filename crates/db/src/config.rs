//! Connection settings for the LightBnB database.

use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

use crate::DbError;

/// Everything needed to open the pool.
///
/// `Default` matches the local development database; `from_env` layers the
/// standard libpq variables on top of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Pool ceiling.
    pub max_connections: u32,
    /// How long a caller waits for a free connection before the query fails.
    pub acquire_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "lightbnb".to_string(),
            user: "labber".to_string(),
            password: "labber".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 30,
        }
    }
}

impl DbConfig {
    /// Build a config from `PGHOST`, `PGPORT`, `PGDATABASE`, `PGUSER`,
    /// `PGPASSWORD` and `LIGHTBNB_MAX_CONNECTIONS`, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, DbError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DbConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DbError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("PGHOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PGPORT") {
            config.port = parse_var("PGPORT", &port)?;
        }
        if let Some(database) = lookup("PGDATABASE") {
            config.database = database;
        }
        if let Some(user) = lookup("PGUSER") {
            config.user = user;
        }
        if let Some(password) = lookup("PGPASSWORD") {
            config.password = password;
        }
        if let Some(max) = lookup("LIGHTBNB_MAX_CONNECTIONS") {
            config.max_connections = parse_var("LIGHTBNB_MAX_CONNECTIONS", &max)?;
        }

        if config.max_connections == 0 {
            return Err(DbError::InvalidConfig(
                "LIGHTBNB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, DbError> {
    raw.trim()
        .parse()
        .map_err(|_| DbError::InvalidConfig(format!("{key} is not a valid number: {raw:?}")))
}
