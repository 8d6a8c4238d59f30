//! `alerts` table access: the [`AlertStore`] implementation.
//!
//! Deduplication is not enforced here; the partial unique index from the
//! schema does it, and [`AlertStore::insert_alert`] translates that
//! rejection into [`StoreError::DuplicateUnread`] for the policy layer.

use rusqlite::params;

use super::{SqliteStore, is_unique_violation, micros_to_datetime, parse_enum, to_usize};
use crate::model::{Alert, AlertId, AlertKind, ItemId, NewAlert, UserId};
use crate::store::{AlertStore, StoreError};

const SELECT_ALERT: &str = "SELECT alert_id, user_id, item_id, kind, priority, message, \
     is_read, created_at_us \
     FROM alerts";

fn row_to_alert(row: &rusqlite::Row<'_>) -> rusqlite::Result<Alert> {
    let kind: String = row.get(3)?;
    let priority: String = row.get(4)?;
    Ok(Alert {
        id: AlertId::new(row.get(0)?),
        user_id: UserId::new(row.get(1)?),
        item_id: row.get::<_, Option<i64>>(2)?.map(ItemId::new),
        kind: parse_enum(3, &kind)?,
        priority: parse_enum(4, &priority)?,
        message: row.get(5)?,
        read: row.get::<_, i64>(6)? != 0,
        created_at: micros_to_datetime(7, row.get(7)?)?,
    })
}

impl AlertStore for SqliteStore {
    fn find_unread(
        &self,
        user: UserId,
        item: Option<ItemId>,
        kind: AlertKind,
    ) -> Result<Option<Alert>, StoreError> {
        // COALESCE matches the unread-slot index expression, so this probe
        // stays on the index.
        let sql = format!(
            "{SELECT_ALERT} \
             WHERE user_id = ?1 \
               AND COALESCE(item_id, 0) = COALESCE(?2, 0) \
               AND kind = ?3 \
               AND is_read = 0"
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let result = stmt.query_row(
            params![user.get(), item.map(ItemId::get), kind.as_str()],
            row_to_alert,
        );
        match result {
            Ok(alert) => Ok(Some(alert)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn insert_alert(&self, alert: &NewAlert) -> Result<Alert, StoreError> {
        let result = self.conn.execute(
            "INSERT INTO alerts (
                user_id,
                item_id,
                kind,
                priority,
                message,
                is_read,
                created_at_us
             ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![
                alert.user_id.get(),
                alert.item_id.map(ItemId::get),
                alert.kind.as_str(),
                alert.priority.as_str(),
                alert.message,
                alert.created_at.timestamp_micros(),
            ],
        );

        match result {
            Ok(_) => Ok(Alert {
                id: AlertId::new(self.conn.last_insert_rowid()),
                user_id: alert.user_id,
                item_id: alert.item_id,
                kind: alert.kind,
                priority: alert.priority,
                message: alert.message.clone(),
                read: false,
                created_at: alert.created_at,
            }),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateUnread),
            Err(err) => Err(err.into()),
        }
    }

    fn alerts_for_user(&self, user: UserId) -> Result<Vec<Alert>, StoreError> {
        let sql = format!(
            "{SELECT_ALERT} WHERE user_id = ?1 \
             ORDER BY created_at_us DESC, alert_id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let alerts = stmt
            .query_map(params![user.get()], row_to_alert)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(alerts)
    }

    fn mark_read(&self, alert: AlertId) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE alerts SET is_read = 1 WHERE alert_id = ?1",
            params![alert.get()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn mark_all_read(&self, user: UserId) -> Result<usize, StoreError> {
        let changed = self.conn.execute(
            "UPDATE alerts SET is_read = 1 WHERE user_id = ?1 AND is_read = 0",
            params![user.get()],
        )?;
        Ok(changed)
    }

    fn count_unread(&self, user: UserId) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM alerts WHERE user_id = ?1 AND is_read = 0",
            params![user.get()],
            |row| row.get(0),
        )?;
        Ok(to_usize(0, count)?)
    }
}
