//! Resource registry: which identity registered which content

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};
use crate::event::RegistryEvent;
use crate::identifier::{Did, ResourceId};
use crate::identity::IdentityRegistry;

/// Optional descriptive fields supplied at registration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMetadata {
    /// Human-readable file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Where the content lives (e.g. an IPFS CID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_uri: Option<String>,
}

/// A registered resource. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub resource_id: ResourceId,
    pub owner_did: Did,
    /// Logical timestamp, non-decreasing in registration order
    pub registered_at: u64,
    /// 0-based position in registration order
    pub index: u64,
    pub metadata: ResourceMetadata,
}

/// Latest analysis result attached to a resource
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub result: String,
    pub analyzed_at: u64,
}

#[derive(Debug, Default)]
pub struct ResourceRegistry {
    records: HashMap<ResourceId, ResourceRecord>,
    /// Registration order
    order: Vec<ResourceId>,
    analyses: HashMap<ResourceId, Analysis>,
    last_registered_at: u64,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered resources
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn exists(&self, resource_id: &ResourceId) -> bool {
        self.records.contains_key(resource_id)
    }

    pub fn get(&self, resource_id: &ResourceId) -> RegistryResult<&ResourceRecord> {
        self.records
            .get(resource_id)
            .ok_or(RegistryError::NotFound(*resource_id))
    }

    pub fn get_owner(&self, resource_id: &ResourceId) -> RegistryResult<Did> {
        self.get(resource_id).map(|record| record.owner_did)
    }

    /// Resources registered under `owner`, in registration order
    pub fn owned_by(&self, owner: &Did) -> Vec<ResourceId> {
        self.order
            .iter()
            .filter(|id| self.records.get(*id).is_some_and(|r| r.owner_did == *owner))
            .copied()
            .collect()
    }

    pub fn analysis(&self, resource_id: &ResourceId) -> Option<&Analysis> {
        self.analyses.get(resource_id)
    }

    /// Validate a registration and produce its event
    pub fn plan_register(
        &self,
        identities: &IdentityRegistry,
        resource_id: &ResourceId,
        owner_did: &Did,
        metadata: ResourceMetadata,
        now: u64,
    ) -> RegistryResult<RegistryEvent> {
        if self.records.contains_key(resource_id) {
            return Err(RegistryError::AlreadyExists(*resource_id));
        }
        if !identities.is_registered(owner_did) {
            return Err(RegistryError::InvalidOwner(*owner_did));
        }

        Ok(RegistryEvent::ResourceRegistered {
            resource_id: *resource_id,
            owner_did: *owner_did,
            registered_at: now.max(self.last_registered_at),
            index: self.order.len() as u64,
            metadata,
        })
    }

    /// Record a registration, re-checking the invariants of [`plan_register`](Self::plan_register)
    pub fn apply_registered(
        &mut self,
        identities: &IdentityRegistry,
        record: ResourceRecord,
    ) -> RegistryResult<()> {
        if self.records.contains_key(&record.resource_id) {
            return Err(RegistryError::AlreadyExists(record.resource_id));
        }
        if !identities.is_registered(&record.owner_did) {
            return Err(RegistryError::InvalidOwner(record.owner_did));
        }
        if record.index != self.order.len() as u64 {
            return Err(RegistryError::CorruptJournal(format!(
                "resource {} has index {}, expected {}",
                record.resource_id,
                record.index,
                self.order.len()
            )));
        }
        if record.registered_at < self.last_registered_at {
            return Err(RegistryError::CorruptJournal(format!(
                "resource {} registered at {} before {}",
                record.resource_id, record.registered_at, self.last_registered_at
            )));
        }

        self.last_registered_at = record.registered_at;
        self.order.push(record.resource_id);
        self.records.insert(record.resource_id, record);
        Ok(())
    }

    pub fn plan_analysis(
        &self,
        resource_id: &ResourceId,
        analysis: String,
        now: u64,
    ) -> RegistryResult<RegistryEvent> {
        self.get(resource_id)?;
        Ok(RegistryEvent::ResourceAnalyzed {
            resource_id: *resource_id,
            analysis,
            analyzed_at: now,
        })
    }

    /// Attach an analysis, replacing any earlier one
    pub fn apply_analyzed(
        &mut self,
        resource_id: &ResourceId,
        analysis: Analysis,
    ) -> RegistryResult<()> {
        self.get(resource_id)?;
        self.analyses.insert(*resource_id, analysis);
        Ok(())
    }
}
