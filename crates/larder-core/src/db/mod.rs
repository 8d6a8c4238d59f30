//! SQLite store plumbing.
//!
//! Runtime defaults are intentionally conservative:
//! - `journal_mode = WAL` so dashboard reads never block the sweep's writes
//! - `busy_timeout = 5s` to ride out transient lock contention
//! - `foreign_keys = ON` so user deletion cascades to items and alerts
//!
//! Row mapping converts stored text back into the typed enums and dates of
//! [`crate::model`]; a value that no longer parses surfaces as a SQLite
//! conversion error rather than a panic, and the sweep skips past it.

pub mod alerts;
pub mod items;
pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, types::Type};
use std::{path::Path, str::FromStr, time::Duration};

use crate::model::{ParseEnumError, UserId};
use crate::store::StoreError;

/// Busy timeout applied to every store connection.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// The SQLite-backed implementation of the store traits.
///
/// Holds a single connection; share across threads behind a mutex (the
/// connection is `Send` but not `Sync`).
pub struct SqliteStore {
    pub(crate) conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the store database at `path`, apply runtime pragmas,
    /// and migrate the schema to the latest version.
    ///
    /// # Errors
    ///
    /// Returns an error if opening, configuring, or migrating fails.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create store directory {}", parent.display()))?;
        }

        let mut conn = Connection::open(path)
            .with_context(|| format!("open store database {}", path.display()))?;

        configure_connection(&conn).context("configure sqlite pragmas")?;
        migrations::migrate(&mut conn).context("apply store migrations")?;

        Ok(Self { conn })
    }

    /// In-memory store for tests and scratch use.
    ///
    /// # Errors
    ///
    /// Returns an error if configuring or migrating the database fails.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory().context("open in-memory store")?;
        configure_connection(&conn).context("configure sqlite pragmas")?;
        migrations::migrate(&mut conn).context("apply store migrations")?;
        Ok(Self { conn })
    }

    /// Register a household account and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] on insert failure, including a
    /// duplicate email.
    pub fn insert_user(
        &self,
        email: &str,
        created_at: DateTime<Utc>,
    ) -> Result<UserId, StoreError> {
        self.conn.execute(
            "INSERT INTO users (email, created_at_us) VALUES (?1, ?2)",
            rusqlite::params![email, created_at.timestamp_micros()],
        )?;
        Ok(UserId::new(self.conn.last_insert_rowid()))
    }
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

/// Whether `err` is a UNIQUE constraint rejection.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Decode a `*_at_us` column back into a UTC instant.
pub(crate) fn micros_to_datetime(idx: usize, micros: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp out of range: {micros}").into(),
        )
    })
}

/// Parse an ISO `YYYY-MM-DD` column.
pub(crate) fn parse_date(idx: usize, text: &str) -> rusqlite::Result<NaiveDate> {
    text.parse().map_err(|error: chrono::ParseError| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(error))
    })
}

/// Parse an enum column stored as text.
pub(crate) fn parse_enum<T>(idx: usize, text: &str) -> rusqlite::Result<T>
where
    T: FromStr<Err = ParseEnumError>,
{
    text.parse().map_err(|error: ParseEnumError| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(error))
    })
}

/// Convert a SQL count into `usize`.
pub(crate) fn to_usize(idx: usize, value: i64) -> rusqlite::Result<usize> {
    usize::try_from(value).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(error))
    })
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_BUSY_TIMEOUT, SqliteStore, migrations};
    use crate::store::StoreError;
    use chrono::Utc;
    use tempfile::TempDir;

    fn temp_db_path() -> (TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("larder.sqlite3");
        (dir, path)
    }

    #[test]
    fn open_sets_wal_busy_timeout_and_fk() {
        let (_dir, path) = temp_db_path();
        let store = SqliteStore::open(&path).expect("open store db");

        let journal_mode: String = store
            .conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .expect("query journal_mode");
        assert_eq!(journal_mode.to_ascii_lowercase(), "wal");

        let busy_timeout_ms: u64 = store
            .conn
            .pragma_query_value(None, "busy_timeout", |row| row.get(0))
            .expect("query busy_timeout");
        assert_eq!(u128::from(busy_timeout_ms), DEFAULT_BUSY_TIMEOUT.as_millis());

        let foreign_keys: i64 = store
            .conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .expect("query foreign_keys");
        assert_eq!(foreign_keys, 1);
    }

    #[test]
    fn open_runs_migrations() {
        let (_dir, path) = temp_db_path();
        let store = SqliteStore::open(&path).expect("open store db");

        let version =
            migrations::current_schema_version(&store.conn).expect("schema version query");
        assert_eq!(version, migrations::LATEST_SCHEMA_VERSION);
    }

    #[test]
    fn open_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("nested/data/larder.sqlite3");
        SqliteStore::open(&path).expect("open store db");
        assert!(path.exists());
    }

    #[test]
    fn insert_user_assigns_ids_and_rejects_duplicates() {
        let store = SqliteStore::open_in_memory().expect("open in-memory store");
        let now = Utc::now();

        let a = store.insert_user("a@example.com", now).expect("first user");
        let b = store.insert_user("b@example.com", now).expect("second user");
        assert!(b > a);

        let dup = store.insert_user("a@example.com", now);
        assert!(matches!(dup, Err(StoreError::Sqlite(_))));
    }
}
