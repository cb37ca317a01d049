//! Property search and listing creation.

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, instrument};

use crate::{
    DbError,
    models::{NewProperty, PropertyListing, PropertyRow},
    query::{like_contains, Clause},
};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PROPERTY_LIMIT: u32 = 10;

const LISTING_BASE: &str = "SELECT properties.*, \
     AVG(property_reviews.rating)::FLOAT8 AS average_rating\n\
     FROM properties\n\
     LEFT JOIN property_reviews ON property_reviews.property_id = properties.id";

/// Optional search criteria for [`get_all_properties`]. Prices are whole
/// dollars per night; the table stores cents.
///
/// Empty and zero values mean "no filter", so a blank search form field
/// can be passed straight through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyFilter {
    /// Case-sensitive substring of the city name.
    pub city: Option<String>,
    pub owner_id: Option<i32>,
    /// Exclusive lower bound.
    pub minimum_price_per_night: Option<i32>,
    /// Exclusive upper bound.
    pub maximum_price_per_night: Option<i32>,
    /// Exclusive lower bound on the mean review score.
    pub minimum_rating: Option<f64>,
}

fn dollars_to_cents(dollars: i32) -> i32 {
    dollars.saturating_mul(100)
}

fn non_zero(value: Option<i32>) -> Option<i32> {
    value.filter(|v| *v != 0)
}

/// Assemble the listing query for `filter`.
pub fn listing_query(filter: &PropertyFilter, limit: u32) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(LISTING_BASE);
    let mut predicates = Clause::where_clause();

    if let Some(city) = filter.city.as_deref().filter(|c| !c.is_empty()) {
        predicates.push(&mut builder, "properties.city LIKE", like_contains(city));
    }
    if let Some(owner_id) = filter.owner_id {
        predicates.push(&mut builder, "properties.owner_id =", owner_id);
    }
    if let Some(min) = non_zero(filter.minimum_price_per_night) {
        predicates.push(&mut builder, "properties.cost_per_night >", dollars_to_cents(min));
    }
    if let Some(max) = non_zero(filter.maximum_price_per_night) {
        predicates.push(&mut builder, "properties.cost_per_night <", dollars_to_cents(max));
    }

    builder.push("\nGROUP BY properties.id");

    if let Some(rating) = filter.minimum_rating.filter(|r| *r != 0.0) {
        Clause::having_clause().push(
            &mut builder,
            "AVG(property_reviews.rating)::FLOAT8 >",
            rating,
        );
    }

    builder.push("\nORDER BY properties.cost_per_night, properties.id");
    builder.push("\nLIMIT ").push_bind(i64::from(limit));

    builder
}

/// List up to `limit` properties matching `filter`, cheapest first. No match
/// is an empty list.
#[instrument(skip(pool), err)]
pub async fn get_all_properties(
    pool: &PgPool,
    filter: &PropertyFilter,
    limit: u32,
) -> Result<Vec<PropertyListing>, DbError> {
    let mut builder = listing_query(filter, limit);
    debug!(sql = builder.sql(), "property listing query");

    let rows = builder
        .build_query_as::<PropertyListing>()
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Insert a property and return the stored row, including its new id.
///
/// `owner_id` must reference an existing user; otherwise the foreign key
/// violation is returned as `DbError::Sqlx`.
#[instrument(skip(pool, property), fields(owner_id = property.owner_id, title = %property.title), err)]
pub async fn add_property(pool: &PgPool, property: &NewProperty) -> Result<PropertyRow, DbError> {
    let row = sqlx::query_as::<_, PropertyRow>(
        r#"
        INSERT INTO properties (
            owner_id,
            title,
            description,
            thumbnail_photo_url,
            cover_photo_url,
            cost_per_night,
            street,
            city,
            province,
            post_code,
            country,
            parking_spaces,
            number_of_bathrooms,
            number_of_bedrooms
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(property.owner_id)
    .bind(&property.title)
    .bind(&property.description)
    .bind(&property.thumbnail_photo_url)
    .bind(&property.cover_photo_url)
    .bind(property.cost_per_night)
    .bind(&property.street)
    .bind(&property.city)
    .bind(&property.province)
    .bind(&property.post_code)
    .bind(&property.country)
    .bind(property.parking_spaces)
    .bind(property.number_of_bathrooms)
    .bind(property.number_of_bedrooms)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_for(filter: &PropertyFilter, limit: u32) -> String {
        listing_query(filter, limit).sql().to_string()
    }

    #[test]
    fn no_filter_only_groups_orders_and_limits() {
        let sql = sql_for(&PropertyFilter::default(), DEFAULT_PROPERTY_LIMIT);

        assert_eq!(
            sql,
            "SELECT properties.*, AVG(property_reviews.rating)::FLOAT8 AS average_rating\n\
             FROM properties\n\
             LEFT JOIN property_reviews ON property_reviews.property_id = properties.id\n\
             GROUP BY properties.id\n\
             ORDER BY properties.cost_per_night, properties.id\n\
             LIMIT $1"
        );
    }

    #[test]
    fn price_range_filters_cost_per_night() {
        let filter = PropertyFilter {
            minimum_price_per_night: Some(100),
            maximum_price_per_night: Some(200),
            ..Default::default()
        };
        let sql = sql_for(&filter, 10);

        assert!(sql.contains(
            "\nWHERE properties.cost_per_night > $1 AND properties.cost_per_night < $2\n"
        ));
        assert!(sql.ends_with("LIMIT $3"));
    }

    #[test]
    fn city_is_a_single_like_predicate() {
        let filter = PropertyFilter {
            city: Some("van".into()),
            ..Default::default()
        };
        let sql = sql_for(&filter, 3);

        assert!(sql.contains("\nWHERE properties.city LIKE $1\nGROUP BY"));
        assert!(sql.ends_with("LIMIT $2"));
        assert!(!sql.contains("van"));
    }

    #[test]
    fn empty_and_zero_values_are_not_filters() {
        let blank = PropertyFilter {
            city: Some(String::new()),
            minimum_price_per_night: Some(0),
            maximum_price_per_night: Some(0),
            minimum_rating: Some(0.0),
            ..Default::default()
        };
        assert_eq!(
            sql_for(&blank, 10),
            sql_for(&PropertyFilter::default(), 10)
        );
    }

    #[test]
    fn zero_minimum_keeps_other_bounds() {
        let filter = PropertyFilter {
            minimum_price_per_night: Some(0),
            maximum_price_per_night: Some(50),
            ..Default::default()
        };
        let sql = sql_for(&filter, 10);

        assert!(sql.contains("\nWHERE properties.cost_per_night < $1\n"));
        assert!(!sql.contains("cost_per_night >"));
    }

    #[test]
    fn every_filter_combined_in_order() {
        let filter = PropertyFilter {
            city: Some("Van".into()),
            owner_id: Some(7),
            minimum_price_per_night: Some(50),
            maximum_price_per_night: Some(500),
            minimum_rating: Some(3.5),
        };
        let sql = sql_for(&filter, 20);

        assert!(sql.contains(
            "WHERE properties.city LIKE $1 \
             AND properties.owner_id = $2 \
             AND properties.cost_per_night > $3 \
             AND properties.cost_per_night < $4\n\
             GROUP BY properties.id\n\
             HAVING AVG(property_reviews.rating)::FLOAT8 > $5\n"
        ));
        assert!(sql.ends_with("LIMIT $6"));
    }

    #[test]
    fn rating_only_uses_having() {
        let filter = PropertyFilter {
            minimum_rating: Some(4.0),
            ..Default::default()
        };
        let sql = sql_for(&filter, 10);

        assert!(!sql.contains("WHERE"));
        assert!(sql.contains("\nHAVING AVG(property_reviews.rating)::FLOAT8 > $1\n"));
        assert!(sql.ends_with("LIMIT $2"));
    }

    #[test]
    fn huge_prices_saturate_instead_of_overflowing() {
        assert_eq!(dollars_to_cents(i32::MAX), i32::MAX);
        assert_eq!(dollars_to_cents(150), 15_000);
    }

    #[test]
    fn filter_deserializes_from_partial_json() {
        let filter: PropertyFilter =
            serde_json::from_str(r#"{ "city": "Vancouver", "minimum_rating": 4 }"#).unwrap();
        assert_eq!(filter.city.as_deref(), Some("Vancouver"));
        assert_eq!(filter.minimum_rating, Some(4.0));
        assert!(filter.owner_id.is_none());
        assert!(filter.minimum_price_per_night.is_none());
    }
}
