//! Database models for pricing and calendar queries.
//!
//! These models use sqlx's FromRow derive for direct database
//! deserialization. Status columns are TEXT in the platform schema; they are
//! decoded into closed enums so an unknown value is a loud decode error
//! rather than a silently ignored string.

use chrono::{Datelike, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Raised when a status column holds a value outside the known set.
#[derive(Debug, thiserror::Error)]
#[error("unknown {field} value `{value}`")]
pub struct UnknownVariant {
    field: &'static str,
    value: String,
}

/// Lifecycle status of a pricing rule. Only `Active` rules participate in
/// rate resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Active,
    Inactive,
    Archived,
}

impl RuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleStatus::Active => "active",
            RuleStatus::Inactive => "inactive",
            RuleStatus::Archived => "archived",
        }
    }
}

impl TryFrom<String> for RuleStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "active" => Ok(RuleStatus::Active),
            "inactive" => Ok(RuleStatus::Inactive),
            "archived" => Ok(RuleStatus::Archived),
            _ => Err(UnknownVariant {
                field: "pricing rule status",
                value,
            }),
        }
    }
}

/// How a rule's adjustment value is applied to the base rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Signed amount added to the base rate.
    Fixed,
    /// Signed percentage of the base rate added to it.
    Percentage,
}

impl AdjustmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentKind::Fixed => "fixed",
            AdjustmentKind::Percentage => "percentage",
        }
    }
}

impl TryFrom<String> for AdjustmentKind {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "fixed" => Ok(AdjustmentKind::Fixed),
            "percentage" => Ok(AdjustmentKind::Percentage),
            _ => Err(UnknownVariant {
                field: "adjustment kind",
                value,
            }),
        }
    }
}

/// Declared state of an availability block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    Unavailable,
    Blocked,
}

impl AvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::Unavailable => "unavailable",
            AvailabilityStatus::Blocked => "blocked",
        }
    }
}

impl TryFrom<String> for AvailabilityStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "available" => Ok(AvailabilityStatus::Available),
            "unavailable" => Ok(AvailabilityStatus::Unavailable),
            "blocked" => Ok(AvailabilityStatus::Blocked),
            _ => Err(UnknownVariant {
                field: "availability status",
                value,
            }),
        }
    }
}

/// Booking lifecycle status. The calendar only loads bookings in one of the
/// [`BookingStatus::ACTIVE`] states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Statuses that still occupy calendar inventory.
    pub const ACTIVE: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::CheckedIn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "checked_in" => Ok(BookingStatus::CheckedIn),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(UnknownVariant {
                field: "booking status",
                value,
            }),
        }
    }
}

/// Pricing rule from pricing_rules.
///
/// A rule adjusts (or overrides) the homestay's base nightly rate inside its
/// date window, optionally narrowed by weekday, stay length and guest count.
/// `conditions` is an opaque JSON payload written by the platform; this
/// engine carries it through without interpreting it.
#[derive(Debug, Clone, FromRow)]
pub struct PricingRule {
    pub id: Uuid,
    pub homestay_id: Uuid,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub status: RuleStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Advisory time-of-day bounds; never consulted during matching.
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// Weekday allow-list, 0 = Sunday .. 6 = Saturday.
    pub days_of_week: Option<Vec<i16>>,
    pub min_nights: Option<i32>,
    pub max_nights: Option<i32>,
    pub min_guests: Option<i32>,
    pub max_guests: Option<i32>,
    #[sqlx(try_from = "String")]
    pub adjustment_kind: AdjustmentKind,
    pub adjustment_value: Decimal,
    /// Absolute nightly price; when set, the adjustment is ignored.
    pub override_price: Option<Decimal>,
    pub priority: i32,
    pub conditions: serde_json::Value,
}

impl PricingRule {
    /// Check if the rule's date window contains the given date (both ends
    /// inclusive).
    pub fn covers_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Check the weekday allow-list, if one is configured.
    pub fn applies_on_weekday(&self, date: NaiveDate) -> bool {
        match &self.days_of_week {
            Some(days) => days.contains(&(date.weekday().num_days_from_sunday() as i16)),
            None => true,
        }
    }

    /// Check the stay-length bounds, if configured.
    pub fn accepts_stay_length(&self, nights: i64) -> bool {
        if let Some(min) = self.min_nights {
            if nights < i64::from(min) {
                return false;
            }
        }
        if let Some(max) = self.max_nights {
            if nights > i64::from(max) {
                return false;
            }
        }
        true
    }

    /// Check the guest-count bounds, if configured.
    pub fn accepts_guest_count(&self, guests: i32) -> bool {
        if let Some(min) = self.min_guests {
            if guests < min {
                return false;
            }
        }
        if let Some(max) = self.max_guests {
            if guests > max {
                return false;
            }
        }
        true
    }

    /// Full candidate filter, applied in order: date window, weekday set,
    /// stay length, guest count.
    pub fn matches(&self, date: NaiveDate, nights: i64, guests: i32) -> bool {
        self.covers_date(date)
            && self.applies_on_weekday(date)
            && self.accepts_stay_length(nights)
            && self.accepts_guest_count(guests)
    }

    /// Check if the rule's window intersects the inclusive date range.
    pub fn overlaps_range(&self, range_start: NaiveDate, range_end: NaiveDate) -> bool {
        self.start_date <= range_end && self.end_date >= range_start
    }
}

/// Availability block from availability_blocks.
///
/// Declares unit capacity and state for a date range. An absent end date
/// means the block holds until further notice.
#[derive(Debug, Clone, FromRow)]
pub struct AvailabilityBlock {
    pub id: Uuid,
    pub homestay_id: Uuid,
    pub room_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub available_units: i32,
    pub booked_units: i32,
    #[sqlx(try_from = "String")]
    pub status: AvailabilityStatus,
    pub notes: Option<String>,
}

impl AvailabilityBlock {
    /// A date is covered when it falls on or after the block start and the
    /// block is open-ended or ends on or after the date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.map_or(true, |end| end >= date)
    }

    /// Units still open for sale on a covered date.
    pub fn remaining_units(&self) -> i32 {
        self.available_units - self.booked_units
    }
}

/// Booking from bookings. Read-only here; the calendar renders occupancy
/// from these rows but never mutates them.
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub homestay_id: Uuid,
    pub room_id: Option<Uuid>,
    pub guest_name: String,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
}

impl Booking {
    /// Check-out is exclusive: the stay occupies `[check_in, check_out)`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.check_in_date <= date && date < self.check_out_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_parsing_round_trips() {
        for status in ["active", "inactive", "archived"] {
            let parsed = RuleStatus::try_from(status.to_string()).unwrap();
            assert_eq!(parsed.as_str(), status);
        }
        for status in ["pending", "confirmed", "checked_in", "completed", "cancelled"] {
            let parsed = BookingStatus::try_from(status.to_string()).unwrap();
            assert_eq!(parsed.as_str(), status);
        }
        for status in ["available", "unavailable", "blocked"] {
            let parsed = AvailabilityStatus::try_from(status.to_string()).unwrap();
            assert_eq!(parsed.as_str(), status);
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = RuleStatus::try_from("draft".to_string()).unwrap_err();
        assert!(err.to_string().contains("draft"));
        assert!(BookingStatus::try_from("no_show".to_string()).is_err());
        assert!(AdjustmentKind::try_from("multiplier".to_string()).is_err());
    }

    #[test]
    fn test_block_coverage_inclusive_ends() {
        let block = AvailabilityBlock {
            id: Uuid::new_v4(),
            homestay_id: Uuid::new_v4(),
            room_id: None,
            start_date: date(2024, 3, 10),
            end_date: Some(date(2024, 3, 12)),
            available_units: 2,
            booked_units: 0,
            status: AvailabilityStatus::Available,
            notes: None,
        };
        assert!(!block.covers(date(2024, 3, 9)));
        assert!(block.covers(date(2024, 3, 10)));
        assert!(block.covers(date(2024, 3, 12)));
        assert!(!block.covers(date(2024, 3, 13)));
    }

    #[test]
    fn test_open_ended_block_covers_forward() {
        let block = AvailabilityBlock {
            id: Uuid::new_v4(),
            homestay_id: Uuid::new_v4(),
            room_id: None,
            start_date: date(2024, 3, 10),
            end_date: None,
            available_units: 1,
            booked_units: 1,
            status: AvailabilityStatus::Blocked,
            notes: Some("renovation".to_string()),
        };
        assert!(!block.covers(date(2024, 3, 9)));
        assert!(block.covers(date(2024, 3, 10)));
        assert!(block.covers(date(2025, 1, 1)));
    }

    #[test]
    fn test_booking_coverage_checkout_exclusive() {
        let booking = Booking {
            id: Uuid::new_v4(),
            homestay_id: Uuid::new_v4(),
            room_id: None,
            guest_name: "Linh Tran".to_string(),
            status: BookingStatus::Confirmed,
            check_in_date: date(2024, 3, 10),
            check_out_date: date(2024, 3, 12),
        };
        assert!(!booking.covers(date(2024, 3, 9)));
        assert!(booking.covers(date(2024, 3, 10)));
        assert!(booking.covers(date(2024, 3, 11)));
        assert!(!booking.covers(date(2024, 3, 12)));
    }
}
