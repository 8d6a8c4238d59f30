//! Freshness arithmetic over calendar days.
//!
//! Purchase and expiry are dates, not instants: an item "expires on" a day,
//! and its status flips when the household's local date passes that day.
//! Keeping the math on [`NaiveDate`] makes the day difference exact, so the
//! classification below has no sub-day rounding to get wrong.
//!
//! Classification, with `d = days_until(expiry, today)`:
//! - `d < 0`: expired (the expiry day has passed)
//! - `0 <= d <= window`: expiring soon; `d == 0` means "expires today"
//! - `d > window`: fresh

use chrono::{Days, NaiveDate};

use crate::model::FreshnessStatus;

/// Days before expiry at which an item starts counting as expiring soon.
pub const DEFAULT_EXPIRING_WINDOW_DAYS: u32 = 2;

/// The date an item entered the household: `today - days_old`.
///
/// `None` if the subtraction falls outside chrono's representable range;
/// intake validation caps `days_old` well inside it.
#[must_use]
pub fn purchase_date(today: NaiveDate, days_old: u32) -> Option<NaiveDate> {
    today.checked_sub_days(Days::new(u64::from(days_old)))
}

/// The last day an item is good: `purchase + shelf_life_days`.
#[must_use]
pub fn expiry_date(purchase: NaiveDate, shelf_life_days: u32) -> Option<NaiveDate> {
    purchase.checked_add_days(Days::new(u64::from(shelf_life_days)))
}

/// Signed whole days from `today` to `expiry`. Negative once expired.
#[must_use]
pub fn days_until(expiry: NaiveDate, today: NaiveDate) -> i64 {
    expiry.signed_duration_since(today).num_days()
}

/// Classify an item's freshness as of `today`.
#[must_use]
pub fn status_on(
    expiry: NaiveDate,
    today: NaiveDate,
    expiring_window_days: u32,
) -> FreshnessStatus {
    let d = days_until(expiry, today);
    if d < 0 {
        FreshnessStatus::Expired
    } else if d <= i64::from(expiring_window_days) {
        FreshnessStatus::Expiring
    } else {
        FreshnessStatus::Fresh
    }
}
