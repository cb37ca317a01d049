//! Row structs that map onto the LightBnB tables, plus the insert payloads.
//!
//! These are *persistence* models: no behaviour beyond the presence check
//! on [`NewUser`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::DbError;

// ---------------------------------------------------------------------------
// users
// ---------------------------------------------------------------------------

/// A persisted user row. The password is stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Payload for [`crate::repository::users::add_user`].
///
/// Fields are optional so that a partially filled sign-up form can be
/// represented; `add_user` rejects it before touching the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    /// Return `(name, email, password)` if all three are present and
    /// non-empty, otherwise the first missing field.
    pub fn required_fields(&self) -> Result<(&str, &str, &str), DbError> {
        let name = present(&self.name).ok_or(DbError::MissingField("name"))?;
        let email = present(&self.email).ok_or(DbError::MissingField("email"))?;
        let password = present(&self.password).ok_or(DbError::MissingField("password"))?;
        Ok((name, email, password))
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// properties
// ---------------------------------------------------------------------------

/// A persisted property listing. `cost_per_night` is in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PropertyRow {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
}

/// Payload for [`crate::repository::properties::add_property`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProperty {
    pub owner_id: i32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Cents.
    pub cost_per_night: i32,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    #[serde(default)]
    pub parking_spaces: i32,
    #[serde(default)]
    pub number_of_bathrooms: i32,
    #[serde(default)]
    pub number_of_bedrooms: i32,
}

/// A property as returned by the filtered listing, with its mean review
/// score. `average_rating` is `None` for a property nobody has reviewed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PropertyListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: PropertyRow,
    pub average_rating: Option<f64>,
}

// ---------------------------------------------------------------------------
// reservations
// ---------------------------------------------------------------------------

/// One of a guest's reservations joined with the property it is for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ReservationSummary {
    pub id: i32,
    pub guest_id: i32,
    pub property_id: i32,
    pub title: String,
    pub cost_per_night: i32,
    pub thumbnail_photo_url: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub average_rating: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_new_user_passes_presence_check() {
        let user = NewUser::new("Ada", "ada@example.com", "hunter2");
        let (name, email, password) = user.required_fields().unwrap();
        assert_eq!(name, "Ada");
        assert_eq!(email, "ada@example.com");
        assert_eq!(password, "hunter2");
    }

    #[test]
    fn each_missing_field_is_reported() {
        let mut user = NewUser::new("Ada", "ada@example.com", "hunter2");
        user.name = None;
        assert!(matches!(user.required_fields(), Err(DbError::MissingField("name"))));

        let mut user = NewUser::new("Ada", "ada@example.com", "hunter2");
        user.email = None;
        assert!(matches!(user.required_fields(), Err(DbError::MissingField("email"))));

        let mut user = NewUser::new("Ada", "ada@example.com", "hunter2");
        user.password = None;
        assert!(matches!(user.required_fields(), Err(DbError::MissingField("password"))));
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let user = NewUser::new("Ada", "", "hunter2");
        assert!(matches!(user.required_fields(), Err(DbError::MissingField("email"))));
    }

    #[test]
    fn new_user_deserializes_with_absent_fields() {
        let user: NewUser = serde_json::from_str(r#"{ "name": "Ada" }"#).unwrap();
        assert_eq!(user.name.as_deref(), Some("Ada"));
        assert!(user.email.is_none());
        assert!(matches!(user.required_fields(), Err(DbError::MissingField("email"))));
    }

    #[test]
    fn listing_serializes_flat() {
        let listing = PropertyListing {
            property: PropertyRow {
                id: 1,
                owner_id: 2,
                title: "Speed lamp".into(),
                description: String::new(),
                thumbnail_photo_url: "thumb.jpg".into(),
                cover_photo_url: "cover.jpg".into(),
                cost_per_night: 93_061,
                street: "536 Namsub Highway".into(),
                city: "Sotboske".into(),
                province: "Quebec".into(),
                post_code: "28142".into(),
                country: "Canada".into(),
                parking_spaces: 6,
                number_of_bathrooms: 4,
                number_of_bedrooms: 8,
            },
            average_rating: Some(4.5),
        };

        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["city"], "Sotboske");
        assert_eq!(value["average_rating"], 4.5);
        assert!(value.get("property").is_none());
    }
}
