//! Response DTOs for pricing API endpoints.
//!
//! Monetary amounts serialize as decimal strings; dates as `YYYY-MM-DD`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::Homestay;
use crate::pricing::calculators::{AppliedRule, NightlyRate, QuoteTotals, StayQuote};
use crate::pricing::calendar::{CalendarDay, CalendarRange, CalendarSummary, HomestayCalendar};

/// Identifying summary of a homestay, embedded in every pricing response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomestaySummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub base_price: Option<Decimal>,
    pub currency: String,
}

impl From<&Homestay> for HomestaySummary {
    fn from(homestay: &Homestay) -> Self {
        Self {
            id: homestay.id,
            title: homestay.title.clone(),
            slug: homestay.slug.clone(),
            base_price: homestay.base_price,
            currency: homestay.currency.clone(),
        }
    }
}

/// Response for a stay quote
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub homestay: HomestaySummary,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub currency: String,
    pub totals: QuoteTotalsResponse,
    pub nights: Vec<QuoteNightResponse>,
}

impl QuoteResponse {
    pub fn from_quote(
        homestay: &Homestay,
        check_in_date: NaiveDate,
        check_out_date: NaiveDate,
        quote: StayQuote,
    ) -> Self {
        Self {
            homestay: HomestaySummary::from(homestay),
            check_in_date,
            check_out_date,
            currency: quote.currency,
            totals: QuoteTotalsResponse::from(quote.totals),
            nights: quote
                .nightly
                .into_iter()
                .map(QuoteNightResponse::from)
                .collect(),
        }
    }
}

/// Totals block of a quote response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTotalsResponse {
    pub nights: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub average_nightly_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub min_nightly_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub max_nightly_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub extras_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub grand_total: Decimal,
}

impl From<QuoteTotals> for QuoteTotalsResponse {
    fn from(totals: QuoteTotals) -> Self {
        Self {
            nights: totals.nights,
            subtotal: totals.subtotal,
            average_nightly_rate: totals.average_nightly_rate,
            min_nightly_rate: totals.min_nightly_rate,
            max_nightly_rate: totals.max_nightly_rate,
            extras_total: totals.extras_total,
            grand_total: totals.grand_total,
        }
    }
}

/// One priced night in a quote response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteNightResponse {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_rate: Decimal,
    pub applied_rule: Option<AppliedRule>,
}

impl From<NightlyRate> for QuoteNightResponse {
    fn from(night: NightlyRate) -> Self {
        Self {
            date: night.date,
            base_rate: night.base_rate,
            final_rate: night.final_rate,
            applied_rule: night.applied_rule,
        }
    }
}

/// Response for a calendar request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub homestay: HomestaySummary,
    pub range: CalendarRange,
    pub days: Vec<CalendarDay>,
    pub summary: CalendarSummary,
}

impl CalendarResponse {
    pub fn from_calendar(homestay: &Homestay, calendar: HomestayCalendar) -> Self {
        Self {
            homestay: HomestaySummary::from(homestay),
            range: calendar.range,
            days: calendar.days,
            summary: calendar.summary,
        }
    }
}
