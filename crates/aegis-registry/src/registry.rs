//! Registry coordinator
//!
//! Owns the identity, resource and access stores behind one lock. Every
//! mutating operation validates against the current state, journals the
//! resulting event and only then applies it, all while holding the lock, so
//! operations are atomic and totally ordered.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};

use crate::clock::{Clock, SystemClock};
use crate::error::{RegistryError, RegistryResult};
use crate::event::{EventRecord, RegistryEvent};
use crate::identifier::{Did, Principal, ResourceId};
use crate::journal::EventJournal;
use crate::memory::InMemoryJournal;
use crate::resource::{Analysis, ResourceMetadata, ResourceRecord};
use crate::state::RegistryState;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Policy knobs of a registry instance
#[derive(Clone, Debug, Default)]
pub struct RegistryConfig {
    /// Principal allowed to attach analysis results
    pub administrator: Option<Principal>,
    /// Require the caller of `register_resource` to own the supplied owner DID
    pub strict_owner_binding: bool,
}

pub struct Registry {
    state: Mutex<RegistryState>,
    journal: Arc<dyn EventJournal>,
    clock: Arc<dyn Clock>,
    config: RegistryConfig,
    events: broadcast::Sender<EventRecord>,
}

impl Registry {
    /// Empty registry with an in-memory journal and the system clock
    pub fn in_memory(config: RegistryConfig) -> Self {
        Self::with_state(
            RegistryState::new(),
            Arc::new(InMemoryJournal::new()),
            Arc::new(SystemClock),
            config,
        )
    }

    /// Open a registry over an existing journal, replaying every record
    pub async fn open(
        journal: Arc<dyn EventJournal>,
        clock: Arc<dyn Clock>,
        config: RegistryConfig,
    ) -> RegistryResult<Self> {
        let records = journal.load().await?;
        let state = RegistryState::replay(&records)?;
        tracing::info!(
            events = records.len(),
            identities = state.identities.len(),
            resources = state.resources.len(),
            grants = state.access.len(),
            "registry replayed"
        );
        Ok(Self::with_state(state, journal, clock, config))
    }

    fn with_state(
        state: RegistryState,
        journal: Arc<dyn EventJournal>,
        clock: Arc<dyn Clock>,
        config: RegistryConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(state),
            journal,
            clock,
            config,
            events,
        }
    }

    /// Live feed of committed events
    ///
    /// Lagging receivers miss events; use [`events_since`](Self::events_since) to catch up.
    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.events.subscribe()
    }

    /// Journal, apply and publish a validated event
    async fn commit(
        &self,
        state: &mut RegistryState,
        event: RegistryEvent,
    ) -> RegistryResult<EventRecord> {
        let record = EventRecord {
            sequence: state.next_sequence(),
            event,
        };

        self.journal.append(&record).await?;
        state.apply(&record).map_err(|e| {
            tracing::error!(sequence = record.sequence, "journaled event failed to apply: {e}");
            RegistryError::CorruptJournal(format!(
                "event {} ({}) journaled but not applied: {e}",
                record.sequence,
                record.event.kind()
            ))
        })?;

        tracing::info!(sequence = record.sequence, kind = record.event.kind(), "committed");
        // No subscribers is not an error
        let _ = self.events.send(record.clone());
        Ok(record)
    }

    fn rejected<T>(operation: &str, result: RegistryResult<T>) -> RegistryResult<T> {
        if let Err(e) = &result {
            tracing::warn!(operation, kind = e.kind(), "rejected: {e}");
        }
        result
    }

    // --- identities ---

    /// Register a DID for `caller`
    pub async fn register_identity(&self, caller: &Principal) -> RegistryResult<Did> {
        let mut state = self.state.lock().await;
        let event = Self::rejected("register_identity", state.identities.plan_register(caller))?;
        self.commit(&mut state, event).await?;
        Ok(state.identities.get_identity(caller))
    }

    /// DID of `principal`, zero if unregistered
    pub async fn get_identity(&self, principal: &Principal) -> Did {
        self.state.lock().await.identities.get_identity(principal)
    }

    /// Principal behind `did`, zero if unknown
    pub async fn get_principal(&self, did: &Did) -> Principal {
        self.state.lock().await.identities.get_principal(did)
    }

    // --- resources ---

    /// Register `resource_id` under `owner_did`
    ///
    /// Unless `strict_owner_binding` is set, the caller does not need to own
    /// `owner_did`; the owner only has to be a registered identity.
    pub async fn register_resource(
        &self,
        caller: &Principal,
        resource_id: &ResourceId,
        owner_did: &Did,
        metadata: ResourceMetadata,
    ) -> RegistryResult<ResourceRecord> {
        let mut state = self.state.lock().await;

        let planned = if self.config.strict_owner_binding
            && state.identities.get_identity(caller) != *owner_did
        {
            Err(RegistryError::InvalidOwner(*owner_did))
        } else {
            state.resources.plan_register(
                &state.identities,
                resource_id,
                owner_did,
                metadata,
                self.clock.now(),
            )
        };
        let event = Self::rejected("register_resource", planned)?;

        self.commit(&mut state, event).await?;
        state.resources.get(resource_id).cloned()
    }

    /// Owner DID of `resource_id`
    pub async fn get_owner(&self, resource_id: &ResourceId) -> RegistryResult<Did> {
        self.state.lock().await.resources.get_owner(resource_id)
    }

    pub async fn exists(&self, resource_id: &ResourceId) -> bool {
        self.state.lock().await.resources.exists(resource_id)
    }

    /// Full record of `resource_id`
    pub async fn resource(&self, resource_id: &ResourceId) -> RegistryResult<ResourceRecord> {
        self.state.lock().await.resources.get(resource_id).cloned()
    }

    /// Resources registered under `owner`, in registration order
    pub async fn resources_owned_by(&self, owner: &Did) -> Vec<ResourceId> {
        self.state.lock().await.resources.owned_by(owner)
    }

    // --- access control ---

    /// Grant `grantee` access to `resource_id`; only the owner may call this
    pub async fn grant_access(
        &self,
        caller: &Principal,
        resource_id: &ResourceId,
        grantee: &Did,
    ) -> RegistryResult<()> {
        let mut state = self.state.lock().await;
        let planned = state.access.plan_grant(
            &state.identities,
            &state.resources,
            caller,
            resource_id,
            grantee,
        );
        let event = Self::rejected("grant_access", planned)?;
        self.commit(&mut state, event).await?;
        Ok(())
    }

    /// Revoke a grant; only the owner may call this
    pub async fn revoke_access(
        &self,
        caller: &Principal,
        resource_id: &ResourceId,
        grantee: &Did,
    ) -> RegistryResult<()> {
        let mut state = self.state.lock().await;
        let planned = state.access.plan_revoke(
            &state.identities,
            &state.resources,
            caller,
            resource_id,
            grantee,
        );
        let event = Self::rejected("revoke_access", planned)?;
        self.commit(&mut state, event).await?;
        Ok(())
    }

    /// Whether `grantee` holds a grant on `resource_id`
    pub async fn has_access(&self, resource_id: &ResourceId, grantee: &Did) -> bool {
        self.state.lock().await.access.has_access(resource_id, grantee)
    }

    /// Alias of [`has_access`](Self::has_access)
    pub async fn check_access(&self, resource_id: &ResourceId, grantee: &Did) -> bool {
        self.has_access(resource_id, grantee).await
    }

    pub async fn grantees(&self, resource_id: &ResourceId) -> Vec<Did> {
        self.state.lock().await.access.grantees(resource_id)
    }

    pub async fn shared_with(&self, grantee: &Did) -> Vec<ResourceId> {
        self.state.lock().await.access.shared_with(grantee)
    }

    // --- analysis ---

    /// Attach an analysis result to a resource (administrator only)
    pub async fn record_analysis(
        &self,
        caller: &Principal,
        resource_id: &ResourceId,
        analysis: String,
    ) -> RegistryResult<Analysis> {
        let mut state = self.state.lock().await;

        let planned = if self.config.administrator != Some(*caller) {
            Err(RegistryError::NotAdministrator(*caller))
        } else {
            state
                .resources
                .plan_analysis(resource_id, analysis, self.clock.now())
        };
        let event = Self::rejected("record_analysis", planned)?;

        self.commit(&mut state, event).await?;
        state
            .resources
            .analysis(resource_id)
            .cloned()
            .ok_or(RegistryError::NotFound(*resource_id))
    }

    pub async fn analysis(&self, resource_id: &ResourceId) -> Option<Analysis> {
        self.state.lock().await.resources.analysis(resource_id).cloned()
    }

    // --- audit trail ---

    /// Committed events with `sequence >= from`
    pub async fn events_since(&self, from: u64) -> RegistryResult<Vec<EventRecord>> {
        self.journal.since(from).await
    }

    /// Sequence number of the next event
    pub async fn next_sequence(&self) -> u64 {
        self.state.lock().await.next_sequence()
    }
}
