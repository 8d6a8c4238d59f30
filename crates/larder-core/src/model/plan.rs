use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::item::{ParseEnumError, normalize};

/// Billing tiers a household can be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Trial,
    Weekly,
    Monthly,
    Lifetime,
}

impl PlanTier {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Trial => "trial",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Lifetime => "lifetime",
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "trial" => Ok(Self::Trial),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "lifetime" => Ok(Self::Lifetime),
            _ => Err(ParseEnumError {
                expected: "plan tier",
                got: s.to_string(),
            }),
        }
    }
}

/// Caps and capabilities of a tier. Used for display and limit checks by
/// outer layers; the sweep itself never consults these.
///
/// `None` caps mean unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct PlanFeatures {
    pub max_items: Option<u32>,
    pub max_alerts: Option<u32>,
    pub automation_enabled: bool,
    pub recipe_suggestions: bool,
    pub barcode_scanner: bool,
    pub priority_alerts: bool,
    pub description: &'static str,
}

impl PlanFeatures {
    #[must_use]
    pub const fn for_tier(tier: PlanTier) -> Self {
        match tier {
            PlanTier::Trial => Self {
                max_items: Some(50),
                max_alerts: Some(5),
                automation_enabled: false,
                recipe_suggestions: false,
                barcode_scanner: false,
                priority_alerts: false,
                description: "Basic access to test the platform.",
            },
            PlanTier::Weekly => Self {
                max_items: Some(100),
                max_alerts: Some(20),
                automation_enabled: true,
                recipe_suggestions: true,
                barcode_scanner: true,
                priority_alerts: false,
                description: "Great for short-term planning.",
            },
            PlanTier::Monthly => Self {
                max_items: Some(500),
                max_alerts: Some(50),
                automation_enabled: true,
                recipe_suggestions: true,
                barcode_scanner: true,
                priority_alerts: true,
                description: "Perfect for regular home management.",
            },
            PlanTier::Lifetime => Self {
                max_items: None,
                max_alerts: None,
                automation_enabled: true,
                recipe_suggestions: true,
                barcode_scanner: true,
                priority_alerts: true,
                description: "Unlimited access forever.",
            },
        }
    }
}

/// Lifecycle state of a household's subscription record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStanding {
    Active,
    Expired,
    Cancelled,
}

impl SubscriptionStanding {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SubscriptionStanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStanding {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError {
                expected: "subscription standing",
                got: s.to_string(),
            }),
        }
    }
}

/// A household's subscription, as handed to the core by the account layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub tier: PlanTier,
    pub standing: SubscriptionStanding,
    pub start_date: NaiveDate,
    /// `None` means no end date (lifetime access).
    pub end_date: Option<NaiveDate>,
}

impl Subscription {
    /// Whether the subscription grants access on `today`.
    ///
    /// Matches the billing layer's rule: the standing must be active, and
    /// any end date must lie strictly in the future.
    #[must_use]
    pub fn is_active(&self, today: NaiveDate) -> bool {
        is_active(self.standing, self.end_date, today)
    }

    /// Whole days of access remaining; `None` means unbounded.
    #[must_use]
    pub fn days_left(&self, today: NaiveDate) -> Option<u32> {
        days_left(self.end_date, today)
    }

    #[must_use]
    pub const fn features(&self) -> PlanFeatures {
        PlanFeatures::for_tier(self.tier)
    }
}

/// Active standing and (no end date, or an end date strictly after `today`).
#[must_use]
pub fn is_active(
    standing: SubscriptionStanding,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> bool {
    standing == SubscriptionStanding::Active && end_date.is_none_or(|end| end > today)
}

/// Days until `end_date`, floored at zero. `None` when there is no end date.
#[must_use]
pub fn days_left(end_date: Option<NaiveDate>, today: NaiveDate) -> Option<u32> {
    let end = end_date?;
    let diff = end.signed_duration_since(today).num_days();
    Some(u32::try_from(diff.max(0)).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::{
        PlanFeatures, PlanTier, Subscription, SubscriptionStanding, days_left, is_active,
    };
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn tier_table_matches_published_limits() {
        let trial = PlanFeatures::for_tier(PlanTier::Trial);
        assert_eq!(trial.max_items, Some(50));
        assert_eq!(trial.max_alerts, Some(5));
        assert!(!trial.automation_enabled);

        let weekly = PlanFeatures::for_tier(PlanTier::Weekly);
        assert_eq!(weekly.max_items, Some(100));
        assert_eq!(weekly.max_alerts, Some(20));
        assert!(weekly.automation_enabled);
        assert!(!weekly.priority_alerts);

        let monthly = PlanFeatures::for_tier(PlanTier::Monthly);
        assert_eq!(monthly.max_items, Some(500));
        assert_eq!(monthly.max_alerts, Some(50));
        assert!(monthly.priority_alerts);

        let lifetime = PlanFeatures::for_tier(PlanTier::Lifetime);
        assert_eq!(lifetime.max_items, None);
        assert_eq!(lifetime.max_alerts, None);
        assert!(lifetime.priority_alerts);
    }

    #[test]
    fn tier_and_standing_parse_roundtrips() {
        for tier in [
            PlanTier::Trial,
            PlanTier::Weekly,
            PlanTier::Monthly,
            PlanTier::Lifetime,
        ] {
            assert_eq!(PlanTier::from_str(&tier.to_string()).unwrap(), tier);
        }
        for standing in [
            SubscriptionStanding::Active,
            SubscriptionStanding::Expired,
            SubscriptionStanding::Cancelled,
        ] {
            assert_eq!(
                SubscriptionStanding::from_str(&standing.to_string()).unwrap(),
                standing
            );
        }
        assert!(PlanTier::from_str("yearly").is_err());
        assert!(SubscriptionStanding::from_str("paused").is_err());
    }

    #[test]
    fn active_requires_standing_and_future_end() {
        let today = day(2026, 5, 1);
        assert!(is_active(SubscriptionStanding::Active, None, today));
        assert!(is_active(
            SubscriptionStanding::Active,
            Some(day(2026, 5, 2)),
            today
        ));
        // An end date of today no longer grants access.
        assert!(!is_active(
            SubscriptionStanding::Active,
            Some(today),
            today
        ));
        assert!(!is_active(
            SubscriptionStanding::Active,
            Some(day(2026, 4, 30)),
            today
        ));
        assert!(!is_active(SubscriptionStanding::Expired, None, today));
        assert!(!is_active(
            SubscriptionStanding::Cancelled,
            Some(day(2027, 1, 1)),
            today
        ));
    }

    #[test]
    fn days_left_floors_at_zero_and_skips_lifetime() {
        let today = day(2026, 5, 1);
        assert_eq!(days_left(None, today), None);
        assert_eq!(days_left(Some(day(2026, 5, 31)), today), Some(30));
        assert_eq!(days_left(Some(today), today), Some(0));
        assert_eq!(days_left(Some(day(2026, 4, 1)), today), Some(0));
    }

    #[test]
    fn subscription_methods_delegate() {
        let sub = Subscription {
            tier: PlanTier::Monthly,
            standing: SubscriptionStanding::Active,
            start_date: day(2026, 4, 1),
            end_date: Some(day(2026, 5, 1)),
        };
        assert!(sub.is_active(day(2026, 4, 15)));
        assert!(!sub.is_active(day(2026, 5, 1)));
        assert_eq!(sub.days_left(day(2026, 4, 15)), Some(16));
        assert_eq!(sub.features().max_items, Some(500));
    }
}
