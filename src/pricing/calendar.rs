//! Availability/booking/pricing calendar assembly.
//!
//! Same contract as the quote path: callers load the rows up front and the
//! functions here merge them. A calendar is a day-by-day join of three
//! independently loaded collections plus occupancy statistics over the
//! window.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::Homestay;
use crate::pricing::calculators::{prepare_rules, resolve_nightly_rate, AppliedRule, PricingError};
use crate::pricing::models::{
    AvailabilityBlock, AvailabilityStatus, Booking, BookingStatus, PricingRule,
};

/// Window width used when the caller gives neither an end date nor a width.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Which sections of the calendar to load and render.
#[derive(Debug, Clone, Copy)]
pub struct CalendarOptions {
    pub include_availability: bool,
    pub include_bookings: bool,
    pub include_pricing: bool,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            include_availability: true,
            include_bookings: true,
            include_pricing: true,
        }
    }
}

/// Resolve the inclusive `[start, end]` window for a calendar request.
///
/// A missing start falls back to `today`; a missing end falls back to
/// `start + window_days - 1` with a 30-day default width. The resolved end
/// must land strictly after the start, and the width must produce a
/// representable end date; `window` is caller input, so out-of-range widths
/// are a validation error, not an arithmetic fault.
pub fn resolve_window(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    window_days: Option<i64>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), PricingError> {
    let start = start_date.unwrap_or(today);
    let end = match end_date {
        Some(end) => end,
        None => {
            let window = window_days.unwrap_or(DEFAULT_WINDOW_DAYS);
            window
                .checked_sub(1)
                .and_then(Duration::try_days)
                .and_then(|span| start.checked_add_signed(span))
                .ok_or(PricingError::InvalidWindow(window))?
        }
    };
    if end <= start {
        return Err(PricingError::EmptyCalendarWindow);
    }
    Ok((start, end))
}

/// Merge availability blocks, bookings, and rule-resolved pricing into one
/// calendar over `[start_date, end_date]` inclusive.
///
/// Per day: the first loaded block covering the date wins, every active
/// booking covering the date (check-out exclusive) is attached, and pricing
/// is resolved as a literal one-night stay at the homestay's capacity. A
/// homestay without a base price renders with `pricing` empty rather than
/// failing the whole calendar.
pub fn assemble_calendar(
    homestay: &Homestay,
    start_date: NaiveDate,
    end_date: NaiveDate,
    blocks: Vec<AvailabilityBlock>,
    bookings: Vec<Booking>,
    rules: Vec<PricingRule>,
    options: CalendarOptions,
) -> HomestayCalendar {
    let sorted_rules = prepare_rules(rules, start_date, end_date);
    let guest_count = homestay.default_guest_count();
    let total_days = (end_date - start_date).num_days() + 1;

    let mut days = Vec::with_capacity(total_days.max(0) as usize);
    let mut tally = SummaryTally::default();

    for date in start_date.iter_days().take_while(|d| *d <= end_date) {
        let block = blocks.iter().find(|b| b.covers(date));
        tally.record(block);

        let availability = if options.include_availability {
            block.map(DayAvailability::from)
        } else {
            None
        };

        let day_bookings = if options.include_bookings {
            bookings
                .iter()
                .filter(|b| b.covers(date))
                .map(DayBooking::from)
                .collect()
        } else {
            Vec::new()
        };

        let pricing = if options.include_pricing {
            homestay.base_price.map(|base_rate| {
                let resolved = resolve_nightly_rate(date, base_rate, &sorted_rules, 1, guest_count);
                DayPricing {
                    base_rate: resolved.base_rate,
                    final_rate: resolved.final_rate,
                    applied_rule: resolved.applied_rule,
                }
            })
        } else {
            None
        };

        days.push(CalendarDay {
            date,
            availability,
            bookings: day_bookings,
            pricing,
        });
    }

    HomestayCalendar {
        range: CalendarRange {
            start_date,
            end_date,
            total_days,
        },
        summary: tally.into_summary(total_days),
        days,
    }
}

/// Running day classification for the summary block.
///
/// A day with no availability record counts as open. A record that is not
/// `available` blocks the day outright; an `available` record with no units
/// left marks it fully booked.
#[derive(Debug, Default)]
struct SummaryTally {
    available: i64,
    blocked: i64,
    fully_booked: i64,
}

impl SummaryTally {
    fn record(&mut self, block: Option<&AvailabilityBlock>) {
        match block {
            None => self.available += 1,
            Some(b) if b.status != AvailabilityStatus::Available => self.blocked += 1,
            Some(b) if b.remaining_units() > 0 => self.available += 1,
            Some(_) => self.fully_booked += 1,
        }
    }

    fn into_summary(self, total_days: i64) -> CalendarSummary {
        let occupancy_rate = if total_days > 0 {
            self.fully_booked as f64 / total_days as f64
        } else {
            0.0
        };
        CalendarSummary {
            available_days: self.available,
            blocked_days: self.blocked,
            fully_booked_days: self.fully_booked,
            occupancy_rate,
        }
    }
}

/// Assembled calendar: the resolved range, one entry per day, and occupancy
/// statistics.
#[derive(Debug, Clone, Serialize)]
pub struct HomestayCalendar {
    pub range: CalendarRange,
    pub days: Vec<CalendarDay>,
    pub summary: CalendarSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub availability: Option<DayAvailability>,
    pub bookings: Vec<DayBooking>,
    pub pricing: Option<DayPricing>,
}

/// The availability block governing one day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    pub id: Uuid,
    pub room_id: Option<Uuid>,
    pub status: AvailabilityStatus,
    pub available_units: i32,
    pub booked_units: i32,
    pub remaining_units: i32,
    pub notes: Option<String>,
}

impl From<&AvailabilityBlock> for DayAvailability {
    fn from(block: &AvailabilityBlock) -> Self {
        Self {
            id: block.id,
            room_id: block.room_id,
            status: block.status,
            available_units: block.available_units,
            booked_units: block.booked_units,
            remaining_units: block.remaining_units(),
            notes: block.notes.clone(),
        }
    }
}

/// One booking overlapping one day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBooking {
    pub id: Uuid,
    pub room_id: Option<Uuid>,
    pub guest_name: String,
    pub status: BookingStatus,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
}

impl From<&Booking> for DayBooking {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            room_id: booking.room_id,
            guest_name: booking.guest_name.clone(),
            status: booking.status,
            check_in_date: booking.check_in_date,
            check_out_date: booking.check_out_date,
        }
    }
}

/// Rule-resolved rate for one day, priced as a literal one-night stay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPricing {
    pub base_rate: Decimal,
    pub final_rate: Decimal,
    pub applied_rule: Option<AppliedRule>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSummary {
    pub available_days: i64,
    pub blocked_days: i64,
    pub fully_booked_days: i64,
    pub occupancy_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::calculators::calculate_stay_quote;
    use crate::pricing::models::{AdjustmentKind, RuleStatus};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn homestay(base_price: Option<Decimal>, max_guests: Option<i32>) -> Homestay {
        Homestay {
            id: Uuid::new_v4(),
            slug: "riverside-villa".to_string(),
            title: "Riverside Villa".to_string(),
            base_price,
            currency: "VND".to_string(),
            max_guests,
        }
    }

    fn block(
        start: NaiveDate,
        end: Option<NaiveDate>,
        status: AvailabilityStatus,
        available_units: i32,
        booked_units: i32,
    ) -> AvailabilityBlock {
        AvailabilityBlock {
            id: Uuid::new_v4(),
            homestay_id: Uuid::new_v4(),
            room_id: None,
            start_date: start,
            end_date: end,
            available_units,
            booked_units,
            status,
            notes: None,
        }
    }

    fn booking(check_in: NaiveDate, check_out: NaiveDate) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            homestay_id: Uuid::new_v4(),
            room_id: None,
            guest_name: "Linh Tran".to_string(),
            status: BookingStatus::Confirmed,
            check_in_date: check_in,
            check_out_date: check_out,
        }
    }

    fn percentage_rule(name: &str, start: NaiveDate, end: NaiveDate, pct: Decimal) -> PricingRule {
        PricingRule {
            id: Uuid::new_v4(),
            homestay_id: Uuid::new_v4(),
            name: name.to_string(),
            status: RuleStatus::Active,
            start_date: start,
            end_date: end,
            start_time: None,
            end_time: None,
            days_of_week: None,
            min_nights: None,
            max_nights: None,
            min_guests: None,
            max_guests: None,
            adjustment_kind: AdjustmentKind::Percentage,
            adjustment_value: pct,
            override_price: None,
            priority: 0,
            conditions: serde_json::Value::Null,
        }
    }

    // ==================== resolve_window tests ====================

    #[test]
    fn test_resolve_window_defaults_to_thirty_days_from_today() {
        let today = date(2025, 7, 1);
        let (start, end) = resolve_window(None, None, None, today).unwrap();
        assert_eq!(start, today);
        assert_eq!(end, date(2025, 7, 30));
    }

    #[test]
    fn test_resolve_window_explicit_width() {
        let (start, end) =
            resolve_window(Some(date(2025, 7, 1)), None, Some(15), date(2025, 1, 1)).unwrap();
        assert_eq!(start, date(2025, 7, 1));
        assert_eq!(end, date(2025, 7, 15));
    }

    #[test]
    fn test_resolve_window_explicit_end_wins_over_width() {
        let (_, end) = resolve_window(
            Some(date(2025, 7, 1)),
            Some(date(2025, 7, 5)),
            Some(90),
            date(2025, 1, 1),
        )
        .unwrap();
        assert_eq!(end, date(2025, 7, 5));
    }

    #[test]
    fn test_resolve_window_rejects_empty_or_inverted() {
        let today = date(2025, 7, 1);
        assert_eq!(
            resolve_window(Some(today), Some(today), None, today).unwrap_err(),
            PricingError::EmptyCalendarWindow
        );
        assert_eq!(
            resolve_window(Some(today), Some(date(2025, 6, 1)), None, today).unwrap_err(),
            PricingError::EmptyCalendarWindow
        );
        // a one-day width resolves end == start, which is also empty
        assert_eq!(
            resolve_window(Some(today), None, Some(1), today).unwrap_err(),
            PricingError::EmptyCalendarWindow
        );
    }

    #[test]
    fn test_resolve_window_rejects_unrepresentable_widths() {
        // Widths that overflow the duration or push the end date off the
        // calendar must come back as errors, not aborts.
        let today = date(2025, 7, 1);
        for window in [i64::MAX, i64::MIN, 200_000_000] {
            assert_eq!(
                resolve_window(Some(today), None, Some(window), today).unwrap_err(),
                PricingError::InvalidWindow(window)
            );
        }
        // an explicit end date makes the width irrelevant
        let (_, end) =
            resolve_window(Some(today), Some(date(2025, 7, 5)), Some(i64::MAX), today).unwrap();
        assert_eq!(end, date(2025, 7, 5));
    }

    // ==================== summary tests ====================

    #[test]
    fn test_calendar_with_no_records_is_fully_open() {
        let stay = homestay(Some(dec!(1000000)), Some(2));
        let calendar = assemble_calendar(
            &stay,
            date(2024, 1, 1),
            date(2024, 1, 5),
            vec![],
            vec![],
            vec![],
            CalendarOptions::default(),
        );

        assert_eq!(calendar.range.total_days, 5);
        assert_eq!(calendar.days.len(), 5);
        assert_eq!(calendar.summary.available_days, 5);
        assert_eq!(calendar.summary.blocked_days, 0);
        assert_eq!(calendar.summary.fully_booked_days, 0);
        assert_eq!(calendar.summary.occupancy_rate, 0.0);
        assert!(calendar.days.iter().all(|d| d.availability.is_none()));
        assert!(calendar.days.iter().all(|d| d.bookings.is_empty()));
    }

    #[test]
    fn test_calendar_every_day_fully_booked() {
        let stay = homestay(Some(dec!(1000000)), Some(2));
        let blocks = vec![block(
            date(2024, 1, 1),
            Some(date(2024, 1, 5)),
            AvailabilityStatus::Available,
            3,
            3,
        )];
        let calendar = assemble_calendar(
            &stay,
            date(2024, 1, 1),
            date(2024, 1, 5),
            blocks,
            vec![],
            vec![],
            CalendarOptions::default(),
        );

        assert_eq!(calendar.summary.fully_booked_days, 5);
        assert_eq!(calendar.summary.available_days, 0);
        assert_eq!(calendar.summary.occupancy_rate, 1.0);
    }

    #[test]
    fn test_calendar_counts_blocked_days() {
        let stay = homestay(Some(dec!(1000000)), Some(2));
        let blocks = vec![block(
            date(2024, 1, 2),
            Some(date(2024, 1, 3)),
            AvailabilityStatus::Blocked,
            1,
            0,
        )];
        let calendar = assemble_calendar(
            &stay,
            date(2024, 1, 1),
            date(2024, 1, 5),
            blocks,
            vec![],
            vec![],
            CalendarOptions::default(),
        );

        assert_eq!(calendar.summary.blocked_days, 2);
        assert_eq!(calendar.summary.available_days, 3);
        assert_eq!(calendar.summary.occupancy_rate, 0.0);

        let jan2 = &calendar.days[1];
        assert_eq!(
            jan2.availability.as_ref().unwrap().status,
            AvailabilityStatus::Blocked
        );
    }

    // ==================== per-day merge tests ====================

    #[test]
    fn test_first_covering_block_wins() {
        let stay = homestay(Some(dec!(1000000)), Some(2));
        let first = block(
            date(2024, 1, 1),
            Some(date(2024, 1, 10)),
            AvailabilityStatus::Available,
            5,
            0,
        );
        let shadowed = block(
            date(2024, 1, 1),
            Some(date(2024, 1, 10)),
            AvailabilityStatus::Blocked,
            0,
            0,
        );
        let first_id = first.id;

        let calendar = assemble_calendar(
            &stay,
            date(2024, 1, 2),
            date(2024, 1, 4),
            vec![first, shadowed],
            vec![],
            vec![],
            CalendarOptions::default(),
        );

        for day in &calendar.days {
            assert_eq!(day.availability.as_ref().unwrap().id, first_id);
        }
        assert_eq!(calendar.summary.blocked_days, 0);
    }

    #[test]
    fn test_open_ended_block_covers_rest_of_window() {
        let stay = homestay(Some(dec!(1000000)), Some(2));
        let blocks = vec![block(
            date(2024, 1, 3),
            None,
            AvailabilityStatus::Unavailable,
            0,
            0,
        )];
        let calendar = assemble_calendar(
            &stay,
            date(2024, 1, 1),
            date(2024, 1, 5),
            blocks,
            vec![],
            vec![],
            CalendarOptions::default(),
        );

        assert_eq!(calendar.summary.available_days, 2);
        assert_eq!(calendar.summary.blocked_days, 3);
    }

    #[test]
    fn test_bookings_attach_checkout_exclusive() {
        let stay = homestay(Some(dec!(1000000)), Some(2));
        let bookings = vec![booking(date(2024, 1, 2), date(2024, 1, 4))];
        let calendar = assemble_calendar(
            &stay,
            date(2024, 1, 1),
            date(2024, 1, 5),
            vec![],
            bookings,
            vec![],
            CalendarOptions::default(),
        );

        let counts: Vec<usize> = calendar.days.iter().map(|d| d.bookings.len()).collect();
        assert_eq!(counts, vec![0, 1, 1, 0, 0]);
        assert_eq!(calendar.days[1].bookings[0].guest_name, "Linh Tran");
    }

    // ==================== pricing tests ====================

    #[test]
    fn test_day_pricing_reflects_rules() {
        let stay = homestay(Some(dec!(1000000)), Some(2));
        let rules = vec![percentage_rule(
            "tet +40%",
            date(2024, 1, 3),
            date(2024, 1, 4),
            dec!(40),
        )];
        let calendar = assemble_calendar(
            &stay,
            date(2024, 1, 1),
            date(2024, 1, 5),
            vec![],
            vec![],
            rules,
            CalendarOptions::default(),
        );

        let rates: Vec<Decimal> = calendar
            .days
            .iter()
            .map(|d| d.pricing.as_ref().unwrap().final_rate)
            .collect();
        assert_eq!(
            rates,
            vec![
                dec!(1000000),
                dec!(1000000),
                dec!(1400000.00),
                dec!(1400000.00),
                dec!(1000000),
            ]
        );
        assert!(calendar.days[2].pricing.as_ref().unwrap().applied_rule.is_some());
        assert!(calendar.days[0].pricing.as_ref().unwrap().applied_rule.is_none());
    }

    #[test]
    fn test_day_pricing_is_literal_one_night() {
        // Rules gated on longer stays never fire for calendar days.
        let stay = homestay(Some(dec!(1000000)), Some(2));
        let mut weekly =
            percentage_rule("weekly -10%", date(2024, 1, 1), date(2024, 1, 31), dec!(-10));
        weekly.min_nights = Some(2);

        let calendar = assemble_calendar(
            &stay,
            date(2024, 1, 1),
            date(2024, 1, 3),
            vec![],
            vec![],
            vec![weekly],
            CalendarOptions::default(),
        );

        for day in &calendar.days {
            let pricing = day.pricing.as_ref().unwrap();
            assert_eq!(pricing.final_rate, dec!(1000000));
            assert!(pricing.applied_rule.is_none());
        }
    }

    #[test]
    fn test_missing_base_price_leaves_pricing_empty() {
        let stay = homestay(None, Some(2));
        let calendar = assemble_calendar(
            &stay,
            date(2024, 1, 1),
            date(2024, 1, 3),
            vec![],
            vec![],
            vec![],
            CalendarOptions::default(),
        );
        assert!(calendar.days.iter().all(|d| d.pricing.is_none()));
    }

    #[test]
    fn test_include_flags_suppress_sections() {
        let stay = homestay(Some(dec!(1000000)), Some(2));
        let blocks = vec![block(
            date(2024, 1, 1),
            Some(date(2024, 1, 5)),
            AvailabilityStatus::Available,
            2,
            0,
        )];
        let bookings = vec![booking(date(2024, 1, 1), date(2024, 1, 3))];

        let calendar = assemble_calendar(
            &stay,
            date(2024, 1, 1),
            date(2024, 1, 3),
            blocks,
            bookings,
            vec![],
            CalendarOptions {
                include_availability: false,
                include_bookings: false,
                include_pricing: false,
            },
        );

        for day in &calendar.days {
            assert!(day.availability.is_none());
            assert!(day.bookings.is_empty());
            assert!(day.pricing.is_none());
        }
    }

    #[test]
    fn test_one_night_quote_matches_calendar_day() {
        let stay = homestay(Some(dec!(880000)), Some(2));
        let rules = || {
            vec![percentage_rule(
                "march +12%",
                date(2024, 3, 1),
                date(2024, 3, 31),
                dec!(12),
            )]
        };

        let quote = calculate_stay_quote(
            &stay,
            rules(),
            date(2024, 3, 10),
            date(2024, 3, 11),
            2,
            0,
            Decimal::ZERO,
        )
        .unwrap();

        let calendar = assemble_calendar(
            &stay,
            date(2024, 3, 10),
            date(2024, 3, 11),
            vec![],
            vec![],
            rules(),
            CalendarOptions::default(),
        );

        let day_rate = calendar.days[0].pricing.as_ref().unwrap().final_rate;
        assert_eq!(quote.nightly[0].final_rate, day_rate);
    }
}
