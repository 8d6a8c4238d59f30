use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::ids::{AlertId, ItemId, UserId};
use super::item::{ParseEnumError, normalize};

/// What a stored alert is about.
///
/// Wire and column values keep the upper snake form (`EXPIRED`, ...) that
/// household clients already display verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    ExpiringSoon,
    Expired,
    LowStock,
}

impl AlertKind {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::ExpiringSoon => "EXPIRING_SOON",
            Self::Expired => "EXPIRED",
            Self::LowStock => "LOW_STOCK",
        }
    }

    /// Fixed kind-to-priority mapping; callers never pick a priority.
    #[must_use]
    pub const fn priority(self) -> AlertPriority {
        match self {
            Self::Expired => AlertPriority::Danger,
            Self::ExpiringSoon => AlertPriority::Warning,
            Self::LowStock => AlertPriority::Info,
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "expiring_soon" => Ok(Self::ExpiringSoon),
            "expired" => Ok(Self::Expired),
            "low_stock" => Ok(Self::LowStock),
            _ => Err(ParseEnumError {
                expected: "alert kind",
                got: s.to_string(),
            }),
        }
    }
}

/// How urgently an alert should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    Info,
    Warning,
    Danger,
}

impl AlertPriority {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "danger" => Ok(Self::Danger),
            _ => Err(ParseEnumError {
                expected: "alert priority",
                got: s.to_string(),
            }),
        }
    }
}

/// A notification row in the alert log.
///
/// `item_id` is `None` for household-level alerts (plan limits and the
/// like); item-scoped alerts keep the id of the item that tripped them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub user_id: UserId,
    pub item_id: Option<ItemId>,
    pub kind: AlertKind,
    pub priority: AlertPriority,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for an alert about to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlert {
    pub user_id: UserId,
    pub item_id: Option<ItemId>,
    pub kind: AlertKind,
    pub priority: AlertPriority,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
