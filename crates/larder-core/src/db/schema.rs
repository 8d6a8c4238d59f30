//! Canonical SQLite schema for the larder store.
//!
//! Three tables, all keyed by rowid aliases:
//! - `users` anchors ownership; items and alerts cascade from it
//! - `items` carries the dates the freshness calculator derived at intake,
//!   with a CHECK tying `expiry_date` to `purchase_date + shelf_life_days`
//! - `alerts` is the append-mostly notification log; a partial unique index
//!   holds the one-unread-per-slot rule inside the database itself
//!
//! `item_id` on alerts is a soft reference: households delete items freely,
//! and their old alerts must stay readable in the log.

/// Migration v1: core tables.
pub const MIGRATION_V1_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE CHECK (length(trim(email)) > 0),
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS items (
    item_id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    quantity TEXT NOT NULL CHECK (length(trim(quantity)) > 0),
    shelf_life_days INTEGER NOT NULL CHECK (shelf_life_days >= 0),
    purchase_date TEXT NOT NULL CHECK (date(purchase_date) IS NOT NULL),
    expiry_date TEXT NOT NULL CHECK (date(expiry_date) IS NOT NULL),
    status TEXT NOT NULL DEFAULT 'fresh' CHECK (status IN ('fresh', 'expiring', 'expired')),
    created_at_us INTEGER NOT NULL,
    CHECK (expiry_date = date(purchase_date, '+' || shelf_life_days || ' days'))
);

CREATE TABLE IF NOT EXISTS alerts (
    alert_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    item_id INTEGER,
    kind TEXT NOT NULL CHECK (kind IN ('EXPIRING_SOON', 'EXPIRED', 'LOW_STOCK')),
    priority TEXT NOT NULL DEFAULT 'info' CHECK (priority IN ('info', 'warning', 'danger')),
    message TEXT NOT NULL CHECK (length(trim(message)) > 0),
    is_read INTEGER NOT NULL DEFAULT 0 CHECK (is_read IN (0, 1)),
    created_at_us INTEGER NOT NULL
);
"#;

/// Migration v2: read-path indexes and the unread-slot uniqueness rule.
///
/// `COALESCE(item_id, 0)` folds household-level alerts (NULL item) into one
/// slot; 0 never collides with a real item because rowids start at 1.
pub const MIGRATION_V2_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_items_owner_expiry
    ON items(owner_id, expiry_date);

CREATE INDEX IF NOT EXISTS idx_items_owner_status
    ON items(owner_id, status);

CREATE INDEX IF NOT EXISTS idx_alerts_user_created
    ON alerts(user_id, created_at_us DESC);

CREATE UNIQUE INDEX IF NOT EXISTS idx_alerts_unread_slot
    ON alerts(user_id, COALESCE(item_id, 0), kind)
    WHERE is_read = 0;
"#;

/// Indexes expected by list/sweep/alert query paths.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_items_owner_expiry",
    "idx_items_owner_status",
    "idx_alerts_user_created",
    "idx_alerts_unread_slot",
];
