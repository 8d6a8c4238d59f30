//! Domain types: items and their freshness states, the alert log rows,
//! plan tiers, and the shelf-life catalog.

pub mod alert;
pub mod catalog;
pub mod ids;
pub mod item;
pub mod plan;

pub use alert::{Alert, AlertKind, AlertPriority, NewAlert};
pub use ids::{AlertId, ItemId, UserId};
pub use item::{FreshnessStatus, Item, ItemDraft, MAX_DAY_SPAN, ParseEnumError, ValidationError};
pub use plan::{PlanFeatures, PlanTier, Subscription, SubscriptionStanding};
