//! The three stores as one versioned state

use crate::access::{AccessControl, GrantRecord};
use crate::error::{RegistryError, RegistryResult};
use crate::event::{EventRecord, RegistryEvent};
use crate::identity::IdentityRegistry;
use crate::resource::{Analysis, ResourceRecord, ResourceRegistry};

/// Identities, resources and grants, plus the position in the event order
#[derive(Debug, Default)]
pub struct RegistryState {
    pub identities: IdentityRegistry,
    pub resources: ResourceRegistry,
    pub access: AccessControl,
    next_sequence: u64,
}

impl RegistryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number the next committed event will carry
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Apply a committed event
    ///
    /// Fails without mutating anything if the record is out of order or
    /// violates a store invariant.
    pub fn apply(&mut self, record: &EventRecord) -> RegistryResult<()> {
        if record.sequence != self.next_sequence {
            return Err(RegistryError::CorruptJournal(format!(
                "expected event {}, found {}",
                self.next_sequence, record.sequence
            )));
        }

        match &record.event {
            RegistryEvent::IdentityRegistered { principal, did } => {
                self.identities.apply_registered(principal, did)?;
            }
            RegistryEvent::ResourceRegistered {
                resource_id,
                owner_did,
                registered_at,
                index,
                metadata,
            } => {
                let resource = ResourceRecord {
                    resource_id: *resource_id,
                    owner_did: *owner_did,
                    registered_at: *registered_at,
                    index: *index,
                    metadata: metadata.clone(),
                };
                self.resources.apply_registered(&self.identities, resource)?;
            }
            RegistryEvent::AccessGranted {
                resource_id,
                grantee_did,
                granter_did,
            } => {
                let grant = GrantRecord {
                    resource_id: *resource_id,
                    grantee_did: *grantee_did,
                    granter_did: *granter_did,
                };
                self.access.apply_granted(&self.resources, grant)?;
            }
            RegistryEvent::AccessRevoked {
                resource_id,
                grantee_did,
                revoker_did,
            } => {
                self.access
                    .apply_revoked(&self.resources, resource_id, grantee_did, revoker_did)?;
            }
            RegistryEvent::ResourceAnalyzed {
                resource_id,
                analysis,
                analyzed_at,
            } => {
                let analysis = Analysis {
                    result: analysis.clone(),
                    analyzed_at: *analyzed_at,
                };
                self.resources.apply_analyzed(resource_id, analysis)?;
            }
        }

        self.next_sequence += 1;
        Ok(())
    }

    /// Rebuild state from a full journal
    pub fn replay(records: &[EventRecord]) -> RegistryResult<Self> {
        let mut state = Self::new();
        for record in records {
            state.apply(record).map_err(|e| match e {
                RegistryError::CorruptJournal(msg) => RegistryError::CorruptJournal(msg),
                other => RegistryError::CorruptJournal(format!(
                    "event {} ({}): {other}",
                    record.sequence,
                    record.event.kind()
                )),
            })?;
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::{Did, Principal, ResourceId};
    use crate::resource::ResourceMetadata;

    fn records(events: Vec<RegistryEvent>) -> Vec<EventRecord> {
        events
            .into_iter()
            .enumerate()
            .map(|(i, event)| EventRecord {
                sequence: i as u64,
                event,
            })
            .collect()
    }

    #[test]
    fn test_replay_builds_state() {
        let alice = Principal::from_bytes([1; 20]);
        let bob = Principal::from_bytes([2; 20]);
        let alice_did = Did::derive(&alice, 0);
        let bob_did = Did::derive(&bob, 1);
        let file = ResourceId::from_content(b"file");

        let log = records(vec![
            RegistryEvent::IdentityRegistered {
                principal: alice,
                did: alice_did,
            },
            RegistryEvent::IdentityRegistered {
                principal: bob,
                did: bob_did,
            },
            RegistryEvent::ResourceRegistered {
                resource_id: file,
                owner_did: alice_did,
                registered_at: 10,
                index: 0,
                metadata: ResourceMetadata::default(),
            },
            RegistryEvent::AccessGranted {
                resource_id: file,
                grantee_did: bob_did,
                granter_did: alice_did,
            },
        ]);

        let state = RegistryState::replay(&log).unwrap();

        assert_eq!(state.next_sequence(), 4);
        assert_eq!(state.identities.get_identity(&bob), bob_did);
        assert_eq!(state.resources.get_owner(&file).unwrap(), alice_did);
        assert!(state.access.has_access(&file, &bob_did));
    }

    #[test]
    fn test_replay_rejects_gap() {
        let alice = Principal::from_bytes([1; 20]);
        let log = vec![EventRecord {
            sequence: 3,
            event: RegistryEvent::IdentityRegistered {
                principal: alice,
                did: Did::derive(&alice, 0),
            },
        }];

        let result = RegistryState::replay(&log);
        assert!(matches!(result, Err(RegistryError::CorruptJournal(_))));
    }

    #[test]
    fn test_replay_rejects_grant_by_non_owner() {
        let alice = Principal::from_bytes([1; 20]);
        let bob = Principal::from_bytes([2; 20]);
        let alice_did = Did::derive(&alice, 0);
        let bob_did = Did::derive(&bob, 1);
        let file = ResourceId::from_content(b"file");

        let log = records(vec![
            RegistryEvent::IdentityRegistered {
                principal: alice,
                did: alice_did,
            },
            RegistryEvent::IdentityRegistered {
                principal: bob,
                did: bob_did,
            },
            RegistryEvent::ResourceRegistered {
                resource_id: file,
                owner_did: alice_did,
                registered_at: 10,
                index: 0,
                metadata: ResourceMetadata::default(),
            },
            RegistryEvent::AccessGranted {
                resource_id: file,
                grantee_did: alice_did,
                granter_did: bob_did,
            },
        ]);

        let result = RegistryState::replay(&log);
        assert!(matches!(result, Err(RegistryError::CorruptJournal(msg)) if msg.contains("event 3")));
    }
}
