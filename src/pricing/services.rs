//! Pricing service functions with database access.
//!
//! These functions load the homestay (through the cache), pull the rule,
//! availability, and booking snapshots for the requested range, and hand
//! everything to the pure calculators. All validation of caller input
//! happens here, before any row is fetched.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::db;
use crate::error::AppError;
use crate::models::Homestay;

use super::calculators::{calculate_stay_quote, parse_iso_date, PricingError};
use super::calendar::{assemble_calendar, resolve_window, CalendarOptions};
use super::models::BookingStatus;
use super::queries;
use super::requests::{CalendarQuery, QuoteRequest};
use super::responses::{CalendarResponse, QuoteResponse};

/// Load a homestay through the cache, falling back to the database.
async fn load_homestay(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
) -> Result<Arc<Homestay>, AppError> {
    if let Some(cached) = cache.homestays.get(&id).await {
        tracing::debug!("Cache HIT for homestay: {}", id);
        return Ok(cached);
    }

    tracing::debug!("Cache MISS for homestay: {}", id);
    let homestay = Arc::new(db::queries::get_published_homestay(pool, id).await?);
    cache.homestays.insert(id, homestay.clone()).await;
    Ok(homestay)
}

/// Price a stay and return the full quote response.
///
/// Dates are validated before anything is loaded; the rule set is fetched
/// once for the stay range and resolved night by night.
pub async fn quote_stay(
    pool: &PgPool,
    cache: &AppCache,
    homestay_id: Uuid,
    request: QuoteRequest,
) -> Result<QuoteResponse, AppError> {
    let check_in = parse_iso_date(&request.check_in_date)?;
    let check_out = parse_iso_date(&request.check_out_date)?;
    if check_out <= check_in {
        return Err(PricingError::CheckOutNotAfterCheckIn.into());
    }

    let homestay = load_homestay(pool, cache, homestay_id).await?;
    let rules = queries::get_active_pricing_rules(pool, homestay_id, check_in, check_out).await?;

    let quote = calculate_stay_quote(
        &homestay,
        rules,
        check_in,
        check_out,
        request.adults,
        request.children,
        request.extra_fees_total.unwrap_or(Decimal::ZERO),
    )?;

    tracing::debug!(
        homestay = %homestay_id,
        nights = quote.totals.nights,
        "quote computed"
    );

    Ok(QuoteResponse::from_quote(
        &homestay, check_in, check_out, quote,
    ))
}

/// Assemble the availability/pricing calendar for a homestay.
///
/// Each section's rows are loaded only when that section is requested; an
/// excluded section contributes an empty collection to the merge.
pub async fn build_calendar(
    pool: &PgPool,
    cache: &AppCache,
    homestay_id: Uuid,
    query: CalendarQuery,
) -> Result<CalendarResponse, AppError> {
    let start_date = query.start_date.as_deref().map(parse_iso_date).transpose()?;
    let end_date = query.end_date.as_deref().map(parse_iso_date).transpose()?;

    let today = Utc::now().date_naive();
    let (start, end) = resolve_window(start_date, end_date, query.window, today)?;

    let homestay = load_homestay(pool, cache, homestay_id).await?;

    let options = CalendarOptions {
        include_availability: query.include_availability,
        include_bookings: query.include_bookings,
        include_pricing: query.include_pricing,
    };

    let blocks = if options.include_availability {
        queries::get_availability_blocks(pool, homestay_id, start, end).await?
    } else {
        Vec::new()
    };

    let bookings = if options.include_bookings {
        queries::get_bookings_overlapping(pool, homestay_id, start, end, &BookingStatus::ACTIVE)
            .await?
    } else {
        Vec::new()
    };

    let rules = if options.include_pricing {
        queries::get_active_pricing_rules(pool, homestay_id, start, end).await?
    } else {
        Vec::new()
    };

    let calendar = assemble_calendar(&homestay, start, end, blocks, bookings, rules, options);

    tracing::debug!(
        homestay = %homestay_id,
        days = calendar.days.len(),
        occupancy = calendar.summary.occupancy_rate,
        "calendar assembled"
    );

    Ok(CalendarResponse::from_calendar(&homestay, calendar))
}
