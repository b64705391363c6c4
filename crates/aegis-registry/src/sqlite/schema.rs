//! SQLite schema definitions

use crate::error::{RegistryError, RegistryResult};
use rusqlite::{Connection, OptionalExtension};

pub const SCHEMA_VERSION: u32 = 1;

/// Initialize the database schema
///
/// Refuses databases written by a newer schema version.
pub fn init_schema(conn: &Connection) -> RegistryResult<()> {
    conn.execute_batch(
        r#"
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );

        -- Committed registry events, gap-free from 0
        CREATE TABLE IF NOT EXISTS events (
            sequence INTEGER PRIMARY KEY,
            kind TEXT NOT NULL,                    -- identity_registered, access_granted, ...
            payload TEXT NOT NULL,                 -- JSON RegistryEvent
            recorded_at INTEGER NOT NULL           -- Unix timestamp
        );

        CREATE INDEX IF NOT EXISTS idx_events_kind
            ON events(kind);
    "#,
    )?;

    let stored = check_version(conn)?;
    if stored > SCHEMA_VERSION {
        return Err(RegistryError::Journal(format!(
            "database schema version {stored} is newer than supported version {SCHEMA_VERSION}"
        )));
    }

    conn.execute(
        "INSERT OR REPLACE INTO schema_version (version) VALUES (?)",
        [SCHEMA_VERSION],
    )?;

    Ok(())
}

/// Stored schema version, 0 if uninitialized
pub fn check_version(conn: &Connection) -> RegistryResult<u32> {
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<u32>>(0)
        })
        .optional()?
        .flatten();
    Ok(version.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let version = check_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_init_schema_is_repeatable() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(check_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?)",
            [SCHEMA_VERSION + 1],
        )
        .unwrap();

        let result = init_schema(&conn);
        assert!(matches!(result, Err(RegistryError::Journal(_))));
        assert_eq!(check_version(&conn).unwrap(), SCHEMA_VERSION + 1);
    }
}
