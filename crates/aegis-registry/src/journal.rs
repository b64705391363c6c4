//! Event journal: the durable, append-only audit trail

use async_trait::async_trait;

use crate::error::RegistryResult;
use crate::event::EventRecord;

/// Persists committed events in sequence order
#[async_trait]
pub trait EventJournal: Send + Sync {
    /// Append the next record
    ///
    /// Returns error if `record.sequence` is not exactly the current length.
    async fn append(&self, record: &EventRecord) -> RegistryResult<()>;

    /// All records, in sequence order
    async fn load(&self) -> RegistryResult<Vec<EventRecord>>;

    /// Records with `sequence >= from`, in sequence order
    async fn since(&self, from: u64) -> RegistryResult<Vec<EventRecord>>;

    /// Number of records
    async fn len(&self) -> RegistryResult<u64>;
}
