//! User lookups and sign-up.

use sqlx::PgPool;
use tracing::instrument;

use crate::{
    DbError,
    models::{NewUser, UserRow},
};

/// Fetch the user with exactly this email, or `None`.
#[instrument(skip(pool), err)]
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"SELECT id, name, email, password FROM users WHERE email = $1 LIMIT 1"#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Fetch a single user by primary key, or `None`.
#[instrument(skip(pool), err)]
pub async fn get_user_by_id(pool: &PgPool, id: i32) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"SELECT id, name, email, password FROM users WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Insert a new user and return the stored row.
///
/// Returns `DbError::MissingField` without issuing any query if `name`,
/// `email` or `password` is absent or empty. A duplicate email surfaces as
/// the database's unique-violation error.
#[instrument(skip(pool, user), fields(email = ?user.email), err)]
pub async fn add_user(pool: &PgPool, user: &NewUser) -> Result<UserRow, DbError> {
    let (name, email, password) = user.required_fields()?;

    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (name, email, password)
        VALUES ($1, $2, $3)
        RETURNING id, name, email, password
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
