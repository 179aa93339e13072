//! Request DTOs for pricing API endpoints.
//!
//! Dates arrive as `YYYY-MM-DD` strings and are parsed in the service layer
//! so a malformed date surfaces as a validation error, not a framework
//! rejection.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Request body for a stay quote
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub check_in_date: String,
    pub check_out_date: String,
    #[serde(default)]
    pub adults: i32,
    #[serde(default)]
    pub children: i32,
    /// Carried by booking forms; infants do not count toward rule matching.
    #[serde(default)]
    pub infants: i32,
    /// Carried by booking forms; promo handling lives outside the rate math.
    #[serde(default)]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub extra_fees_total: Option<Decimal>,
}

/// Query parameters for the calendar endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarQuery {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub window: Option<i64>,
    #[serde(default = "default_true")]
    pub include_availability: bool,
    #[serde(default = "default_true")]
    pub include_bookings: bool,
    #[serde(default = "default_true")]
    pub include_pricing: bool,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_request_accepts_camel_case_and_defaults() {
        let request: QuoteRequest = serde_json::from_str(
            r#"{
                "checkInDate": "2025-07-01",
                "checkOutDate": "2025-07-03",
                "adults": 2,
                "extraFeesTotal": "150000"
            }"#,
        )
        .unwrap();

        assert_eq!(request.check_in_date, "2025-07-01");
        assert_eq!(request.adults, 2);
        assert_eq!(request.children, 0);
        assert_eq!(request.infants, 0);
        assert!(request.promo_code.is_none());
        assert_eq!(request.extra_fees_total, Some(dec!(150000)));
    }

    #[test]
    fn test_quote_request_accepts_numeric_money() {
        let request: QuoteRequest = serde_json::from_str(
            r#"{
                "checkInDate": "2025-07-01",
                "checkOutDate": "2025-07-02",
                "extraFeesTotal": 99000
            }"#,
        )
        .unwrap();
        assert_eq!(request.extra_fees_total, Some(dec!(99000)));
    }

    #[test]
    fn test_calendar_query_sections_default_on() {
        let query: CalendarQuery = serde_json::from_str("{}").unwrap();
        assert!(query.include_availability);
        assert!(query.include_bookings);
        assert!(query.include_pricing);
        assert!(query.start_date.is_none());
        assert!(query.window.is_none());

        let query: CalendarQuery =
            serde_json::from_str(r#"{"includePricing": false, "window": 7}"#).unwrap();
        assert!(!query.include_pricing);
        assert_eq!(query.window, Some(7));
    }
}
