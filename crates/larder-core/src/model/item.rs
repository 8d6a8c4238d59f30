use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::ids::{ItemId, UserId};
use crate::freshness;

/// Upper bound for `shelf_life_days` and `days_old` at intake (100 years).
pub const MAX_DAY_SPAN: u32 = 36_500;

/// The three freshness states an item moves through as its expiry date
/// approaches and passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessStatus {
    Fresh,
    Expiring,
    Expired,
}

impl FreshnessStatus {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Expiring => "expiring",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for FreshnessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FreshnessStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "fresh" => Ok(Self::Fresh),
            "expiring" => Ok(Self::Expiring),
            "expired" => Ok(Self::Expired),
            _ => Err(ParseEnumError {
                expected: "freshness status",
                got: s.to_string(),
            }),
        }
    }
}

/// A tracked grocery item as persisted in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub owner_id: UserId,
    pub name: String,
    pub quantity: String,
    pub shelf_life_days: u32,
    pub purchase_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: FreshnessStatus,
    pub created_at: DateTime<Utc>,
}

/// Validated intake data for a new item.
///
/// Intake supplies how long the household has already owned the item
/// (`days_old`) and its shelf life; the draft derives the purchase date,
/// the expiry date, and the status the item starts in. Rows are only ever
/// written from a draft, so invalid names, quantities, or day spans never
/// reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub quantity: String,
    pub shelf_life_days: u32,
    pub purchase_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: FreshnessStatus,
}

impl ItemDraft {
    /// Validate intake fields and derive the date-dependent ones.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the name or quantity is blank,
    /// when either day count exceeds [`MAX_DAY_SPAN`], or when the derived
    /// dates would fall outside the supported calendar range.
    pub fn new(
        name: &str,
        quantity: &str,
        shelf_life_days: u32,
        days_old: u32,
        today: NaiveDate,
        expiring_window_days: u32,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::BlankName);
        }
        let quantity = quantity.trim();
        if quantity.is_empty() {
            return Err(ValidationError::BlankQuantity);
        }
        if shelf_life_days > MAX_DAY_SPAN {
            return Err(ValidationError::ShelfLifeTooLong(shelf_life_days));
        }
        if days_old > MAX_DAY_SPAN {
            return Err(ValidationError::OwnedTooLong(days_old));
        }

        let purchase_date =
            freshness::purchase_date(today, days_old).ok_or(ValidationError::DateOutOfRange)?;
        let expiry_date = freshness::expiry_date(purchase_date, shelf_life_days)
            .ok_or(ValidationError::DateOutOfRange)?;
        let status = freshness::status_on(expiry_date, today, expiring_window_days);

        Ok(Self {
            name: name.to_string(),
            quantity: quantity.to_string(),
            shelf_life_days,
            purchase_date,
            expiry_date,
            status,
        })
    }
}

/// Error returned when intake data for a new item is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The name is empty after trimming.
    #[error("item name must not be blank")]
    BlankName,

    /// The quantity descriptor is empty after trimming.
    #[error("quantity must not be blank")]
    BlankQuantity,

    /// Shelf life exceeds [`MAX_DAY_SPAN`].
    #[error("shelf life of {0} days exceeds the {MAX_DAY_SPAN} day limit")]
    ShelfLifeTooLong(u32),

    /// Days already owned exceeds [`MAX_DAY_SPAN`].
    #[error("{0} days owned exceeds the {MAX_DAY_SPAN} day limit")]
    OwnedTooLong(u32),

    /// Derived purchase or expiry date left the representable range.
    #[error("derived dates fall outside the supported calendar range")]
    DateOutOfRange,
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

pub(super) fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{FreshnessStatus, ItemDraft, MAX_DAY_SPAN, ValidationError};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn status_json_roundtrips() {
        assert_eq!(
            serde_json::to_string(&FreshnessStatus::Fresh).unwrap(),
            "\"fresh\""
        );
        assert_eq!(
            serde_json::to_string(&FreshnessStatus::Expiring).unwrap(),
            "\"expiring\""
        );
        assert_eq!(
            serde_json::to_string(&FreshnessStatus::Expired).unwrap(),
            "\"expired\""
        );

        assert_eq!(
            serde_json::from_str::<FreshnessStatus>("\"expiring\"").unwrap(),
            FreshnessStatus::Expiring
        );
    }

    #[test]
    fn status_display_parse_roundtrips() {
        for value in [
            FreshnessStatus::Fresh,
            FreshnessStatus::Expiring,
            FreshnessStatus::Expired,
        ] {
            let rendered = value.to_string();
            let reparsed = FreshnessStatus::from_str(&rendered).unwrap();
            assert_eq!(value, reparsed);
        }
    }

    #[test]
    fn status_parse_rejects_unknown_values() {
        assert!(FreshnessStatus::from_str("stale").is_err());
        assert!(FreshnessStatus::from_str("").is_err());
    }

    #[test]
    fn draft_derives_dates_and_status() {
        let today = day(2026, 3, 10);
        let draft = ItemDraft::new("Milk", "1L", 7, 2, today, 2).unwrap();
        assert_eq!(draft.purchase_date, day(2026, 3, 8));
        assert_eq!(draft.expiry_date, day(2026, 3, 15));
        assert_eq!(draft.status, FreshnessStatus::Fresh);
    }

    #[test]
    fn draft_starts_expiring_when_bought_near_end_of_shelf_life() {
        let today = day(2026, 3, 10);
        let draft = ItemDraft::new("Yogurt", "4 cups", 5, 4, today, 2).unwrap();
        assert_eq!(draft.expiry_date, day(2026, 3, 11));
        assert_eq!(draft.status, FreshnessStatus::Expiring);
    }

    #[test]
    fn draft_starts_expired_when_shelf_life_already_passed() {
        let today = day(2026, 3, 10);
        let draft = ItemDraft::new("Leftover stew", "1 bowl", 3, 10, today, 2).unwrap();
        assert_eq!(draft.expiry_date, day(2026, 3, 3));
        assert_eq!(draft.status, FreshnessStatus::Expired);
    }

    #[test]
    fn draft_trims_name_and_quantity() {
        let today = day(2026, 3, 10);
        let draft = ItemDraft::new("  Eggs  ", " 12 ", 21, 0, today, 2).unwrap();
        assert_eq!(draft.name, "Eggs");
        assert_eq!(draft.quantity, "12");
    }

    #[test]
    fn draft_rejects_blank_fields() {
        let today = day(2026, 3, 10);
        assert_eq!(
            ItemDraft::new("   ", "1", 7, 0, today, 2),
            Err(ValidationError::BlankName)
        );
        assert_eq!(
            ItemDraft::new("Milk", "", 7, 0, today, 2),
            Err(ValidationError::BlankQuantity)
        );
    }

    #[test]
    fn draft_rejects_absurd_day_spans() {
        let today = day(2026, 3, 10);
        assert_eq!(
            ItemDraft::new("Honey", "1 jar", MAX_DAY_SPAN + 1, 0, today, 2),
            Err(ValidationError::ShelfLifeTooLong(MAX_DAY_SPAN + 1))
        );
        assert_eq!(
            ItemDraft::new("Honey", "1 jar", 30, MAX_DAY_SPAN + 1, today, 2),
            Err(ValidationError::OwnedTooLong(MAX_DAY_SPAN + 1))
        );
        assert!(ItemDraft::new("Honey", "1 jar", MAX_DAY_SPAN, MAX_DAY_SPAN, today, 2).is_ok());
    }
}
