//! SQLite event journal

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::Connection;

use super::schema::init_schema;
use crate::error::{RegistryError, RegistryResult};
use crate::event::{EventRecord, RegistryEvent};
use crate::journal::EventJournal;

/// SQLite-backed event journal
pub struct SqliteJournal {
    conn: Mutex<Connection>,
}

impl SqliteJournal {
    /// Open or create a database at the given path
    pub fn open(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> RegistryResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> RegistryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RegistryError::Journal("connection mutex poisoned".into()))
    }

    fn now() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .ok()
            .and_then(|d| i64::try_from(d.as_secs()).ok())
            .unwrap_or(0)
    }

    fn query(conn: &Connection, from: u64) -> RegistryResult<Vec<EventRecord>> {
        // Cursors beyond the SQLite integer range cannot match any row
        let Ok(from) = i64::try_from(from) else {
            return Ok(Vec::new());
        };

        let mut stmt = conn.prepare(
            "SELECT sequence, payload FROM events WHERE sequence >= ? ORDER BY sequence",
        )?;

        let rows = stmt
            .query_map([from], |row| {
                let sequence: i64 = row.get(0)?;
                let payload: String = row.get(1)?;
                Ok((sequence, payload))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(sequence, payload)| {
                let event: RegistryEvent = serde_json::from_str(&payload)?;
                Ok(EventRecord {
                    sequence: stored_u64(sequence)?,
                    event,
                })
            })
            .collect()
    }
}

fn stored_u64(value: i64) -> RegistryResult<u64> {
    u64::try_from(value)
        .map_err(|_| RegistryError::CorruptJournal(format!("negative sequence value {value}")))
}

#[async_trait]
impl EventJournal for SqliteJournal {
    async fn append(&self, record: &EventRecord) -> RegistryResult<()> {
        let payload = serde_json::to_string(&record.event)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let count: i64 = tx.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        let count = stored_u64(count)?;
        if record.sequence != count {
            return Err(RegistryError::Journal(format!(
                "out-of-order append: expected sequence {count}, got {}",
                record.sequence
            )));
        }

        tx.execute(
            "INSERT INTO events (sequence, kind, payload, recorded_at) VALUES (?, ?, ?, ?)",
            (
                i64::try_from(record.sequence).map_err(|_| {
                    RegistryError::Journal(format!("sequence {} out of range", record.sequence))
                })?,
                record.event.kind(),
                &payload,
                Self::now(),
            ),
        )?;
        tx.commit()?;

        Ok(())
    }

    async fn load(&self) -> RegistryResult<Vec<EventRecord>> {
        let conn = self.lock()?;
        Self::query(&conn, 0)
    }

    async fn since(&self, from: u64) -> RegistryResult<Vec<EventRecord>> {
        let conn = self.lock()?;
        Self::query(&conn, from)
    }

    async fn len(&self) -> RegistryResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        stored_u64(count)
    }
}
