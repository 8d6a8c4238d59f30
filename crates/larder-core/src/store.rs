//! Store traits the sweep and household surfaces are written against.
//!
//! [`crate::db::SqliteStore`] is the shipping implementation; tests wrap it
//! in doubles to inject faults without touching SQLite itself.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{
    Alert, AlertId, AlertKind, FreshnessStatus, Item, ItemDraft, ItemId, NewAlert, UserId,
};

/// Errors surfaced by the persistent stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An unread alert already occupies this (user, item, kind) slot.
    #[error("an unread alert for this user/item/kind already exists")]
    DuplicateUnread,

    /// The addressed row does not exist, or belongs to another user.
    #[error("row not found")]
    NotFound,

    /// Underlying SQLite failure: I/O, constraint, or row mapping.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Per-status item tallies for one household, as shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub fresh: usize,
    pub expiring: usize,
    pub expired: usize,
}

/// Read/write access to tracked items, scoped by owning household.
pub trait InventoryStore {
    /// Ids of every registered household, in registration order.
    ///
    /// # Errors
    /// Returns [`StoreError::Sqlite`] on query failure.
    fn user_ids(&self) -> Result<Vec<UserId>, StoreError>;

    /// Every item a household currently tracks, oldest row first.
    ///
    /// # Errors
    /// Returns [`StoreError::Sqlite`] on query or row-mapping failure.
    fn items_for_user(&self, owner: UserId) -> Result<Vec<Item>, StoreError>;

    /// Persist a validated draft and return the stored row.
    ///
    /// # Errors
    /// Returns [`StoreError::Sqlite`] on insert failure.
    fn insert_item(
        &self,
        owner: UserId,
        draft: &ItemDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Item, StoreError>;

    /// Overwrite one item's freshness status.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if the item no longer exists, or
    /// [`StoreError::Sqlite`] on update failure.
    fn set_item_status(&self, item: ItemId, status: FreshnessStatus) -> Result<(), StoreError>;

    /// A household's items, soonest expiry first, optionally filtered by
    /// status.
    ///
    /// # Errors
    /// Returns [`StoreError::Sqlite`] on query or row-mapping failure.
    fn list_items(
        &self,
        owner: UserId,
        status: Option<FreshnessStatus>,
    ) -> Result<Vec<Item>, StoreError>;

    /// Remove an item. The id must belong to `owner`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no such row exists for this
    /// owner, or [`StoreError::Sqlite`] on delete failure.
    fn delete_item(&self, owner: UserId, item: ItemId) -> Result<(), StoreError>;

    /// Item tallies per freshness status.
    ///
    /// # Errors
    /// Returns [`StoreError::Sqlite`] on query failure.
    fn status_counts(&self, owner: UserId) -> Result<StatusCounts, StoreError>;
}

/// The household alert log.
///
/// Invariant held by implementations: at most one unread alert exists per
/// (user, item, kind) slot. [`AlertStore::insert_alert`] refuses to create
/// a second with [`StoreError::DuplicateUnread`]; marking the existing one
/// read frees the slot.
pub trait AlertStore {
    /// The unread alert occupying a slot, if any. `item` is `None` for
    /// household-level alerts.
    ///
    /// # Errors
    /// Returns [`StoreError::Sqlite`] on query or row-mapping failure.
    fn find_unread(
        &self,
        user: UserId,
        item: Option<ItemId>,
        kind: AlertKind,
    ) -> Result<Option<Alert>, StoreError>;

    /// Append an alert and return the stored row.
    ///
    /// # Errors
    /// Returns [`StoreError::DuplicateUnread`] if an unread alert already
    /// occupies the slot, or [`StoreError::Sqlite`] on insert failure.
    fn insert_alert(&self, alert: &NewAlert) -> Result<Alert, StoreError>;

    /// Every alert for a household, newest first, read or not.
    ///
    /// # Errors
    /// Returns [`StoreError::Sqlite`] on query or row-mapping failure.
    fn alerts_for_user(&self, user: UserId) -> Result<Vec<Alert>, StoreError>;

    /// Mark one alert as read.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if the alert does not exist, or
    /// [`StoreError::Sqlite`] on update failure.
    fn mark_read(&self, alert: AlertId) -> Result<(), StoreError>;

    /// Mark every unread alert for a household as read; returns how many
    /// rows flipped.
    ///
    /// # Errors
    /// Returns [`StoreError::Sqlite`] on update failure.
    fn mark_all_read(&self, user: UserId) -> Result<usize, StoreError>;

    /// Number of unread alerts for a household.
    ///
    /// # Errors
    /// Returns [`StoreError::Sqlite`] on query failure.
    fn count_unread(&self, user: UserId) -> Result<usize, StoreError>;
}
