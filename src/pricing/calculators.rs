//! Core pricing calculation functions.
//!
//! Pure functions for rate resolution and stay quoting - no database access.
//! Services load whatever rows they need and hand plain values in, so every
//! path through here is deterministic and unit-testable.

use std::cmp::Ordering;

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::Homestay;
use crate::pricing::models::{AdjustmentKind, PricingRule, RuleStatus};

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use lotusstays_web::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Parse a `YYYY-MM-DD` calendar date from request input.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate, PricingError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| PricingError::InvalidDate(input.to_string()))
}

/// Number of nights between check-in and check-out, never less than 1.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days().max(1)
}

/// Guest count used for rule matching.
///
/// Falls back to the homestay's configured capacity (or a single guest) when
/// the request does not carry an explicit party size.
pub fn effective_guest_count(adults: i32, children: i32, max_guests: Option<i32>) -> i32 {
    let requested = adults + children;
    if requested > 0 {
        requested
    } else {
        max_guests.unwrap_or(1)
    }
}

/// Errors raised while validating or computing quotes and calendars.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("check-out date must be after check-in date")]
    CheckOutNotAfterCheckIn,

    #[error("calendar end date must be after the start date")]
    EmptyCalendarWindow,

    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("calendar window of {0} days is out of range")]
    InvalidWindow(i64),

    #[error("homestay has no base price configured")]
    MissingBasePrice,
}

/// Ordering used everywhere a rule set is scanned: higher priority first,
/// ties broken by earlier start date.
///
/// A stable sort with this comparator leaves equal-priority, equal-start
/// rules in their stored order, so resolution is deterministic for a given
/// rule set.
pub fn rule_precedence(a: &PricingRule, b: &PricingRule) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| a.start_date.cmp(&b.start_date))
}

/// Filter a raw rule set down to the candidates for a date range and sort
/// them by [`rule_precedence`].
///
/// Inactive and archived rules are dropped, as are rules whose date window
/// does not intersect `[range_start, range_end]`. Callers run this once per
/// request and resolve every night against the same slice.
pub fn prepare_rules(
    rules: Vec<PricingRule>,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Vec<PricingRule> {
    let mut candidates: Vec<PricingRule> = rules
        .into_iter()
        .filter(|rule| {
            rule.status == RuleStatus::Active && rule.overlaps_range(range_start, range_end)
        })
        .collect();
    candidates.sort_by(rule_precedence);
    candidates
}

/// Resolve the rate for a single night.
///
/// Scans `sorted_rules` (already filtered and ordered by [`prepare_rules`])
/// and applies the first rule matching the date, stay length, and guest
/// count. With no match the base rate stands. Rates never go below zero and
/// are rounded to 2 decimal places.
pub fn resolve_nightly_rate(
    date: NaiveDate,
    base_rate: Decimal,
    sorted_rules: &[PricingRule],
    stay_length_nights: i64,
    guest_count: i32,
) -> ResolvedRate {
    let matched = sorted_rules
        .iter()
        .find(|rule| rule.matches(date, stay_length_nights, guest_count));

    let final_rate = match matched {
        Some(rule) => apply_rule(base_rate, rule),
        None => round_money(base_rate.max(Decimal::ZERO), 2),
    };

    ResolvedRate {
        base_rate,
        final_rate,
        applied_rule: matched.map(AppliedRule::from),
    }
}

fn apply_rule(base_rate: Decimal, rule: &PricingRule) -> Decimal {
    // An override replaces the base outright; adjustments move it.
    let raw = if let Some(override_price) = rule.override_price {
        override_price
    } else {
        match rule.adjustment_kind {
            AdjustmentKind::Fixed => base_rate + rule.adjustment_value,
            AdjustmentKind::Percentage => {
                base_rate + base_rate * rule.adjustment_value / Decimal::ONE_HUNDRED
            }
        }
    };
    round_money(raw.max(Decimal::ZERO), 2)
}

/// Rate for one night after rule resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRate {
    pub base_rate: Decimal,
    pub final_rate: Decimal,
    pub applied_rule: Option<AppliedRule>,
}

/// Identifying summary of the rule that set a nightly rate.
///
/// Serialized as-is into quote and calendar responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedRule {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    pub priority: i32,
}

impl From<&PricingRule> for AppliedRule {
    fn from(rule: &PricingRule) -> Self {
        Self {
            id: rule.id,
            name: rule.name.clone(),
            kind: rule.adjustment_kind,
            priority: rule.priority,
        }
    }
}

/// Price a full stay night by night.
///
/// Validates the date pair, resolves every night in `[check_in, check_out)`
/// against the homestay's active rules, and totals the results. The
/// check-out night is never charged.
///
/// # Arguments
/// * `homestay` - Listing being priced; must carry a base price
/// * `rules` - Raw rule set for the homestay, any status, any window
/// * `check_in` / `check_out` - Stay boundaries, check-out exclusive
/// * `adults` / `children` - Requested party size, used for rule matching
/// * `extra_fees_total` - Pre-summed fees added on top of the room subtotal
pub fn calculate_stay_quote(
    homestay: &Homestay,
    rules: Vec<PricingRule>,
    check_in: NaiveDate,
    check_out: NaiveDate,
    adults: i32,
    children: i32,
    extra_fees_total: Decimal,
) -> Result<StayQuote, PricingError> {
    if check_out <= check_in {
        return Err(PricingError::CheckOutNotAfterCheckIn);
    }
    let base_rate = homestay.base_price.ok_or(PricingError::MissingBasePrice)?;

    let stay_length_nights = nights_between(check_in, check_out);
    let guest_count = effective_guest_count(adults, children, homestay.max_guests);
    let candidates = prepare_rules(rules, check_in, check_out);

    let nightly: Vec<NightlyRate> = check_in
        .iter_days()
        .take_while(|d| *d < check_out)
        .map(|date| {
            let resolved =
                resolve_nightly_rate(date, base_rate, &candidates, stay_length_nights, guest_count);
            NightlyRate {
                date,
                base_rate: resolved.base_rate,
                final_rate: resolved.final_rate,
                applied_rule: resolved.applied_rule,
            }
        })
        .collect();

    let totals = QuoteTotals::from_nightly(&nightly, extra_fees_total);

    Ok(StayQuote {
        currency: homestay.currency.clone(),
        totals,
        nightly,
    })
}

/// One priced night inside a quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NightlyRate {
    pub date: NaiveDate,
    pub base_rate: Decimal,
    pub final_rate: Decimal,
    pub applied_rule: Option<AppliedRule>,
}

/// Aggregates over the nightly rates of a stay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteTotals {
    pub nights: u32,
    pub subtotal: Decimal,
    pub average_nightly_rate: Decimal,
    pub min_nightly_rate: Decimal,
    pub max_nightly_rate: Decimal,
    pub extras_total: Decimal,
    pub grand_total: Decimal,
}

impl QuoteTotals {
    fn from_nightly(nightly: &[NightlyRate], extras_total: Decimal) -> Self {
        let subtotal: Decimal = nightly.iter().map(|night| night.final_rate).sum();
        let average_nightly_rate = if nightly.is_empty() {
            Decimal::ZERO
        } else {
            round_money(subtotal / Decimal::from(nightly.len() as u32), 2)
        };
        Self {
            nights: nightly.len() as u32,
            subtotal,
            average_nightly_rate,
            min_nightly_rate: nightly
                .iter()
                .map(|night| night.final_rate)
                .min()
                .unwrap_or(Decimal::ZERO),
            max_nightly_rate: nightly
                .iter()
                .map(|night| night.final_rate)
                .max()
                .unwrap_or(Decimal::ZERO),
            extras_total,
            grand_total: subtotal + extras_total,
        }
    }
}

/// Complete quote for a stay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StayQuote {
    pub currency: String,
    pub totals: QuoteTotals,
    pub nightly: Vec<NightlyRate>,
}
