//! Pricing and calendar engine for homestay listings.
//!
//! Answers two questions: what does one night cost under the active rule
//! set, and what does a date window look like day by day. Called by the
//! booking frontend via HTTP/JSON.

pub mod calculators;
pub mod calendar;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{round_money, PricingError};
pub use routes::router;
