//! Database queries for the pricing and calendar engine.
//!
//! All queries use sqlx with explicit bind parameters. Each loads one of the
//! three collections the pure layer consumes: rules, availability blocks,
//! and bookings, pre-filtered to the requested date range.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

use super::models::{AvailabilityBlock, Booking, BookingStatus, PricingRule};

/// Get active pricing rules whose window overlaps `[range_start, range_end]`.
///
/// Ordered to match the resolver's precedence contract; the pure layer
/// re-sorts anyway so a stale index cannot change pricing.
pub async fn get_active_pricing_rules(
    pool: &PgPool,
    homestay_id: Uuid,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Result<Vec<PricingRule>, AppError> {
    let rules = sqlx::query_as::<_, PricingRule>(
        r#"
        SELECT
            id, homestay_id, name, status,
            start_date, end_date, start_time, end_time,
            days_of_week, min_nights, max_nights, min_guests, max_guests,
            adjustment_kind, adjustment_value, override_price,
            priority, conditions
        FROM pricing_rules
        WHERE homestay_id = $1
          AND status = 'active'
          AND start_date <= $3
          AND end_date >= $2
        ORDER BY priority DESC, start_date ASC
        "#,
    )
    .bind(homestay_id)
    .bind(range_start)
    .bind(range_end)
    .fetch_all(pool)
    .await?;

    Ok(rules)
}

/// Get availability blocks overlapping `[range_start, range_end]`.
///
/// Open-ended blocks (NULL end date) overlap everything from their start
/// onward. Ordered by start date; the calendar takes the first covering
/// block per day in this order.
pub async fn get_availability_blocks(
    pool: &PgPool,
    homestay_id: Uuid,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Result<Vec<AvailabilityBlock>, AppError> {
    let blocks = sqlx::query_as::<_, AvailabilityBlock>(
        r#"
        SELECT
            id, homestay_id, room_id,
            start_date, end_date,
            available_units, booked_units,
            status, notes
        FROM availability_blocks
        WHERE homestay_id = $1
          AND start_date <= $3
          AND (end_date IS NULL OR end_date >= $2)
        ORDER BY start_date ASC
        "#,
    )
    .bind(homestay_id)
    .bind(range_start)
    .bind(range_end)
    .fetch_all(pool)
    .await?;

    Ok(blocks)
}

/// Get bookings in the given statuses whose stay overlaps
/// `[range_start, range_end]`, check-out exclusive.
pub async fn get_bookings_overlapping(
    pool: &PgPool,
    homestay_id: Uuid,
    range_start: NaiveDate,
    range_end: NaiveDate,
    statuses: &[BookingStatus],
) -> Result<Vec<Booking>, AppError> {
    let status_values: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();

    let bookings = sqlx::query_as::<_, Booking>(
        r#"
        SELECT
            id, homestay_id, room_id,
            guest_name, status,
            check_in_date, check_out_date
        FROM bookings
        WHERE homestay_id = $1
          AND check_in_date <= $3
          AND check_out_date > $2
          AND status = ANY($4)
        ORDER BY check_in_date ASC
        "#,
    )
    .bind(homestay_id)
    .bind(range_start)
    .bind(range_end)
    .bind(status_values)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}
