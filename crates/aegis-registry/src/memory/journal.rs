//! In-memory event journal

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{RegistryError, RegistryResult};
use crate::event::EventRecord;
use crate::journal::EventJournal;

/// Event journal held in memory; lost on restart
#[derive(Default)]
pub struct InMemoryJournal {
    records: RwLock<Vec<EventRecord>>,
}

impl InMemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a journal with existing records, e.g. a snapshot from another host
    pub fn with_records(records: Vec<EventRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl EventJournal for InMemoryJournal {
    async fn append(&self, record: &EventRecord) -> RegistryResult<()> {
        let mut records = self.records.write().await;

        let expected = records.len() as u64;
        if record.sequence != expected {
            return Err(RegistryError::Journal(format!(
                "out-of-order append: expected sequence {expected}, got {}",
                record.sequence
            )));
        }

        records.push(record.clone());
        Ok(())
    }

    async fn load(&self) -> RegistryResult<Vec<EventRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn since(&self, from: u64) -> RegistryResult<Vec<EventRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.sequence >= from)
            .cloned()
            .collect())
    }

    async fn len(&self) -> RegistryResult<u64> {
        Ok(self.records.read().await.len() as u64)
    }
}
