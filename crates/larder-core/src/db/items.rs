//! `items` table access: the [`InventoryStore`] implementation.

use chrono::{DateTime, Utc};
use rusqlite::params;

use super::{SqliteStore, micros_to_datetime, parse_date, parse_enum, to_usize};
use crate::model::{FreshnessStatus, Item, ItemDraft, ItemId, UserId};
use crate::store::{InventoryStore, StatusCounts, StoreError};

const SELECT_ITEM: &str = "SELECT item_id, owner_id, name, quantity, shelf_life_days, \
     purchase_date, expiry_date, status, created_at_us \
     FROM items";

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
    let purchase: String = row.get(5)?;
    let expiry: String = row.get(6)?;
    let status: String = row.get(7)?;
    Ok(Item {
        id: ItemId::new(row.get(0)?),
        owner_id: UserId::new(row.get(1)?),
        name: row.get(2)?,
        quantity: row.get(3)?,
        shelf_life_days: row.get(4)?,
        purchase_date: parse_date(5, &purchase)?,
        expiry_date: parse_date(6, &expiry)?,
        status: parse_enum(7, &status)?,
        created_at: micros_to_datetime(8, row.get(8)?)?,
    })
}

impl InventoryStore for SqliteStore {
    fn user_ids(&self) -> Result<Vec<UserId>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id FROM users ORDER BY user_id")?;
        let ids = stmt
            .query_map([], |row| row.get(0).map(UserId::new))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids)
    }

    fn items_for_user(&self, owner: UserId) -> Result<Vec<Item>, StoreError> {
        let sql = format!("{SELECT_ITEM} WHERE owner_id = ?1 ORDER BY item_id");
        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![owner.get()], row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    fn insert_item(
        &self,
        owner: UserId,
        draft: &ItemDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Item, StoreError> {
        self.conn.execute(
            "INSERT INTO items (
                owner_id,
                name,
                quantity,
                shelf_life_days,
                purchase_date,
                expiry_date,
                status,
                created_at_us
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                owner.get(),
                draft.name,
                draft.quantity,
                draft.shelf_life_days,
                draft.purchase_date.to_string(),
                draft.expiry_date.to_string(),
                draft.status.as_str(),
                created_at.timestamp_micros(),
            ],
        )?;

        Ok(Item {
            id: ItemId::new(self.conn.last_insert_rowid()),
            owner_id: owner,
            name: draft.name.clone(),
            quantity: draft.quantity.clone(),
            shelf_life_days: draft.shelf_life_days,
            purchase_date: draft.purchase_date,
            expiry_date: draft.expiry_date,
            status: draft.status,
            created_at,
        })
    }

    fn set_item_status(&self, item: ItemId, status: FreshnessStatus) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE items SET status = ?1 WHERE item_id = ?2",
            params![status.as_str(), item.get()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn list_items(
        &self,
        owner: UserId,
        status: Option<FreshnessStatus>,
    ) -> Result<Vec<Item>, StoreError> {
        let items = match status {
            Some(status) => {
                let sql = format!(
                    "{SELECT_ITEM} WHERE owner_id = ?1 AND status = ?2 \
                     ORDER BY expiry_date, item_id"
                );
                let mut stmt = self.conn.prepare(&sql)?;
                stmt.query_map(params![owner.get(), status.as_str()], row_to_item)?
                    .collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let sql =
                    format!("{SELECT_ITEM} WHERE owner_id = ?1 ORDER BY expiry_date, item_id");
                let mut stmt = self.conn.prepare(&sql)?;
                stmt.query_map(params![owner.get()], row_to_item)?
                    .collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(items)
    }

    fn delete_item(&self, owner: UserId, item: ItemId) -> Result<(), StoreError> {
        let deleted = self.conn.execute(
            "DELETE FROM items WHERE item_id = ?1 AND owner_id = ?2",
            params![item.get(), owner.get()],
        )?;
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn status_counts(&self, owner: UserId) -> Result<StatusCounts, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) FROM items WHERE owner_id = ?1 GROUP BY status",
        )?;
        let rows = stmt.query_map(params![owner.get()], |row| {
            let status: String = row.get(0)?;
            let status: FreshnessStatus = parse_enum(0, &status)?;
            let count = to_usize(1, row.get(1)?)?;
            Ok((status, count))
        })?;

        let mut counts = StatusCounts::default();
        for row in rows {
            let (status, count) = row?;
            match status {
                FreshnessStatus::Fresh => counts.fresh = count,
                FreshnessStatus::Expiring => counts.expiring = count,
                FreshnessStatus::Expired => counts.expired = count,
            }
            counts.total += count;
        }
        Ok(counts)
    }
}
