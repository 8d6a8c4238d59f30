//! Time injection for the sweep and tests.
//!
//! Everything that asks "what day is it" goes through [`Clock`], so tests
//! can pin the calendar with [`ManualClock`] and walk items through their
//! fresh / expiring / expired transitions without sleeping.

use chrono::{DateTime, Days, NaiveDate, Utc};
use std::sync::{Mutex, PoisonError};

/// Source of the current instant and, derived from it, the current date.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date of [`Clock::now`].
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Production clock backed by `Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    #[must_use]
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Pin the clock to an exact instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = instant;
    }

    /// Move the calendar forward by whole days.
    pub fn advance_days(&self, days: u32) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(next) = now.checked_add_days(Days::new(u64::from(days))) {
            *now = next;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
