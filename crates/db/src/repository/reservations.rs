//! A guest's reservations, joined with the property and its reviews.

use sqlx::PgPool;
use tracing::instrument;

use crate::{DbError, models::ReservationSummary};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_RESERVATION_LIMIT: u32 = 10;

// Reviews are LEFT JOINed so a stay that has not been reviewed yet still
// shows up, with a NULL average.
const RESERVATIONS_FOR_GUEST: &str = r#"
    SELECT reservations.id,
           reservations.guest_id,
           reservations.property_id,
           properties.title,
           properties.cost_per_night,
           properties.thumbnail_photo_url,
           reservations.start_date,
           reservations.end_date,
           AVG(property_reviews.rating)::FLOAT8 AS average_rating
    FROM reservations
    JOIN properties ON reservations.property_id = properties.id
    LEFT JOIN property_reviews ON property_reviews.reservation_id = reservations.id
    WHERE reservations.guest_id = $1
    GROUP BY reservations.id, properties.id
    ORDER BY reservations.start_date ASC, reservations.id ASC
    LIMIT $2
"#;

/// Return up to `limit` reservations made by `guest_id`, earliest start
/// date first. An unknown guest yields an empty list.
#[instrument(skip(pool), err)]
pub async fn get_reservations_for_guest(
    pool: &PgPool,
    guest_id: i32,
    limit: u32,
) -> Result<Vec<ReservationSummary>, DbError> {
    let rows = sqlx::query_as::<_, ReservationSummary>(RESERVATIONS_FOR_GUEST)
        .bind(guest_id)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
