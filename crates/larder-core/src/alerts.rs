//! Alert emission policy.
//!
//! One rule: a household holds at most one unread alert per (user, item,
//! kind) slot. The policy probes the slot and skips when occupied; the
//! store's unique index backstops the race where two writers probe the
//! same empty slot, and the loser treats the rejection as a skip.
//!
//! Failures here are logged and swallowed. A sweep must keep walking the
//! rest of the inventory when one alert cannot be written.

use chrono::{DateTime, Utc};

use crate::model::{Alert, AlertKind, ItemId, NewAlert, UserId};
use crate::store::{AlertStore, StoreError};

/// Create an alert unless its slot already holds an unread one.
///
/// Returns the stored alert, `None` when the slot was occupied, and also
/// `None` when the store failed (logged at warn level, never raised).
pub fn maybe_create_alert<S: AlertStore>(
    store: &S,
    now: DateTime<Utc>,
    user: UserId,
    item: Option<ItemId>,
    kind: AlertKind,
    message: &str,
) -> Option<Alert> {
    match try_create(store, now, user, item, kind, message) {
        Ok(alert) => alert,
        Err(error) => {
            tracing::warn!(
                user = %user,
                item = item.map(ItemId::get),
                kind = %kind,
                error = %error,
                "failed to record alert"
            );
            None
        }
    }
}

fn try_create<S: AlertStore>(
    store: &S,
    now: DateTime<Utc>,
    user: UserId,
    item: Option<ItemId>,
    kind: AlertKind,
    message: &str,
) -> Result<Option<Alert>, StoreError> {
    if store.find_unread(user, item, kind)?.is_some() {
        return Ok(None);
    }

    let alert = NewAlert {
        user_id: user,
        item_id: item,
        kind,
        priority: kind.priority(),
        message: message.to_string(),
        created_at: now,
    };
    match store.insert_alert(&alert) {
        Ok(stored) => Ok(Some(stored)),
        // Another writer filled the slot between probe and insert.
        Err(StoreError::DuplicateUnread) => {
            tracing::debug!(
                user = %user,
                item = item.map(ItemId::get),
                kind = %kind,
                "slot filled concurrently; skipping alert"
            );
            Ok(None)
        }
        Err(error) => Err(error),
    }
}
