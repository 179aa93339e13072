//! Lotus Stays pricing and calendar service.
//!
//! Axum web service that prices stays against host-defined pricing rules
//! and assembles availability/pricing calendars for homestay listings.

pub mod cache;
pub mod db;
pub mod error;
pub mod models;
pub mod pricing;
pub mod routes;

use sqlx::PgPool;

use cache::AppCache;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
}
