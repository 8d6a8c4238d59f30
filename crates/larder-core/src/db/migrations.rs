//! Schema migrations for the larder store database.

use super::schema;
use rusqlite::{Connection, types::Type};

/// Latest schema version understood by this build.
pub const LATEST_SCHEMA_VERSION: u32 = 2;

const MIGRATIONS: &[(u32, &str)] = &[(1, schema::MIGRATION_V1_SQL), (2, schema::MIGRATION_V2_SQL)];

/// Read `PRAGMA user_version` as a `u32`.
///
/// # Errors
///
/// Returns an error if querying SQLite fails or the stored version does not
/// fit in `u32`.
pub fn current_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    u32::try_from(version).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(error))
    })
}

/// Apply all pending migrations in ascending order and return the resulting
/// version.
///
/// Safe to call on every open: a migration only runs when its version is
/// above `user_version`, and the DDL itself uses `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if any migration statement fails.
pub fn migrate(conn: &mut Connection) -> rusqlite::Result<u32> {
    let mut current = current_schema_version(conn)?;

    for (version, sql) in MIGRATIONS {
        if *version <= current {
            continue;
        }

        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", i64::from(*version))?;
        tx.commit()?;
        current = *version;
    }

    Ok(current)
}
