//! `lightbnb` CLI entry-point.
//!
//! Opens the database pool, runs one data-access operation, prints the
//! result as JSON and closes the pool again.
//!
//! Available sub-commands:
//! - `migrate`       run pending database migrations.
//! - `seed`          insert users and properties from JSON fixture files.
//! - `user`          look up a user by email or id.
//! - `add-user`      create a user.
//! - `reservations`  list a guest's reservations.
//! - `properties`    search properties.
//! - `add-property`  create a property from `--json <FILE>`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use db::fixtures;
use db::models::{NewProperty, NewUser};
use db::pool::DbPool;
use db::repository::properties::{self, DEFAULT_PROPERTY_LIMIT};
use db::repository::reservations::{self, DEFAULT_RESERVATION_LIMIT};
use db::repository::users;
use db::{DbConfig, PropertyFilter};

#[derive(Parser)]
#[command(
    name = "lightbnb",
    about = "Query and populate the LightBnB rental database",
    version
)]
struct Cli {
    /// Full connection URL. When absent, PGHOST/PGPORT/PGDATABASE/PGUSER/PGPASSWORD
    /// are used, falling back to the local development database.
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Log at debug level (including generated SQL) unless RUST_LOG is set.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run pending database migrations.
    Migrate,
    /// Insert users and properties from JSON fixture files.
    Seed {
        #[arg(long)]
        users: Option<PathBuf>,
        #[arg(long)]
        properties: Option<PathBuf>,
    },
    /// Look up a single user.
    User {
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        email: Option<String>,
        #[arg(long)]
        id: Option<i32>,
    },
    /// Create a user.
    AddUser {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// List a guest's reservations, earliest first.
    Reservations {
        #[arg(long)]
        guest_id: i32,
        #[arg(long, default_value_t = DEFAULT_RESERVATION_LIMIT)]
        limit: u32,
    },
    /// Search properties.
    Properties {
        /// Case-sensitive substring of the city.
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        owner_id: Option<i32>,
        /// Minimum nightly price in dollars (exclusive).
        #[arg(long)]
        min_price: Option<i32>,
        /// Maximum nightly price in dollars (exclusive).
        #[arg(long)]
        max_price: Option<i32>,
        /// Minimum average rating (exclusive).
        #[arg(long)]
        min_rating: Option<f64>,
        #[arg(long, default_value_t = DEFAULT_PROPERTY_LIMIT)]
        limit: u32,
    },
    /// Create a property from a JSON file holding one property object.
    AddProperty {
        #[arg(long = "json", value_name = "FILE")]
        path: PathBuf,
    },
}

fn init_tracing(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn connect(database_url: Option<&str>) -> Result<DbPool> {
    let config = DbConfig::from_env().context("invalid database configuration")?;
    let pool = match database_url {
        Some(url) => db::pool::create_pool_from_url(url, &config).await,
        None => db::pool::create_pool(&config).await,
    }
    .context("failed to connect to database")?;
    Ok(pool)
}

async fn run(command: Command, pool: &DbPool) -> Result<ExitCode> {
    match command {
        Command::Migrate => {
            db::pool::run_migrations(pool).await.context("migration failed")?;
            info!("Migrations applied successfully");
        }
        Command::Seed {
            users: users_path,
            properties: properties_path,
        } => {
            let new_users: Vec<NewUser> = match users_path {
                Some(path) => fixtures::load_fixture(&path)
                    .await
                    .with_context(|| format!("cannot load users from {}", path.display()))?,
                None => Vec::new(),
            };
            let new_properties: Vec<NewProperty> = match properties_path {
                Some(path) => fixtures::load_fixture(&path)
                    .await
                    .with_context(|| format!("cannot load properties from {}", path.display()))?,
                None => Vec::new(),
            };
            let report = fixtures::seed(pool, &new_users, &new_properties)
                .await
                .context("seeding failed")?;
            println!(
                "Inserted {} users and {} properties",
                report.users, report.properties
            );
        }
        Command::User { email, id } => {
            let user = match (email, id) {
                (Some(email), _) => users::get_user_by_email(pool, &email).await?,
                (None, Some(id)) => users::get_user_by_id(pool, id).await?,
                (None, None) => None,
            };
            match user {
                Some(user) => print_json(&user)?,
                None => {
                    eprintln!("No matching user");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::AddUser {
            name,
            email,
            password,
        } => {
            let user = users::add_user(pool, &NewUser { name, email, password }).await?;
            print_json(&user)?;
        }
        Command::Reservations { guest_id, limit } => {
            let rows = reservations::get_reservations_for_guest(pool, guest_id, limit).await?;
            print_json(&rows)?;
        }
        Command::Properties {
            city,
            owner_id,
            min_price,
            max_price,
            min_rating,
            limit,
        } => {
            let filter = PropertyFilter {
                city,
                owner_id,
                minimum_price_per_night: min_price,
                maximum_price_per_night: max_price,
                minimum_rating: min_rating,
            };
            let rows = properties::get_all_properties(pool, &filter, limit).await?;
            print_json(&rows)?;
        }
        Command::AddProperty { path } => {
            let json = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("cannot read {}", path.display()))?;
            let property: NewProperty = serde_json::from_str(&json)
                .with_context(|| format!("invalid property JSON in {}", path.display()))?;
            let row = properties::add_property(pool, &property).await?;
            print_json(&row)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let pool = connect(cli.database_url.as_deref()).await?;
    let outcome = run(cli.command, &pool).await;
    db::pool::close_pool(pool).await;

    outcome
}
