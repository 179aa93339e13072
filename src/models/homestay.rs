//! Homestay catalog models
//!
//! The homestay catalog is owned by the platform application; this engine
//! only reads published rows to price and render calendars.

use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Homestay from the catalog
#[derive(Debug, Clone, FromRow)]
pub struct Homestay {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    /// Base nightly price. Quotes fail until this is configured.
    pub base_price: Option<Decimal>,
    pub currency: String,
    /// Capacity cap, used as the guest-count fallback when a request does
    /// not name a party size.
    pub max_guests: Option<i32>,
}

impl Homestay {
    /// Guest count used when the caller supplies none: the configured
    /// capacity, else a single guest.
    pub fn default_guest_count(&self) -> i32 {
        self.max_guests.unwrap_or(1)
    }
}
