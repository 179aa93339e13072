//! HTTP route handlers for the pricing API.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::AppState;

use super::requests::{CalendarQuery, QuoteRequest};
use super::responses::{CalendarResponse, QuoteResponse};
use super::services;

/// Build the pricing API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/homestays/:id/quote", post(quote))
        .route("/api/homestays/:id/calendar", get(calendar))
}

/// POST /api/homestays/:id/quote
///
/// Price a stay night by night and return nightly rates plus totals.
pub async fn quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let response = services::quote_stay(&state.db, &state.cache, id, request).await?;
    Ok(Json(response))
}

/// GET /api/homestays/:id/calendar?startDate=&endDate=&window=&includePricing=
///
/// Day-by-day availability, bookings, and pricing over a date window.
pub async fn calendar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let response = services::build_calendar(&state.db, &state.cache, id, query).await?;
    Ok(Json(response))
}
