//! Append-only notifications of committed registry transitions

use serde::{Deserialize, Serialize};

use crate::identifier::{Did, Principal, ResourceId};
use crate::resource::ResourceMetadata;

/// A single committed state change
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryEvent {
    IdentityRegistered {
        principal: Principal,
        did: Did,
    },
    ResourceRegistered {
        resource_id: ResourceId,
        owner_did: Did,
        registered_at: u64,
        index: u64,
        #[serde(default)]
        metadata: ResourceMetadata,
    },
    AccessGranted {
        resource_id: ResourceId,
        grantee_did: Did,
        granter_did: Did,
    },
    AccessRevoked {
        resource_id: ResourceId,
        grantee_did: Did,
        revoker_did: Did,
    },
    ResourceAnalyzed {
        resource_id: ResourceId,
        analysis: String,
        analyzed_at: u64,
    },
}

impl RegistryEvent {
    /// Short name used for journal rows and log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IdentityRegistered { .. } => "identity_registered",
            Self::ResourceRegistered { .. } => "resource_registered",
            Self::AccessGranted { .. } => "access_granted",
            Self::AccessRevoked { .. } => "access_revoked",
            Self::ResourceAnalyzed { .. } => "resource_analyzed",
        }
    }
}

/// An event together with its position in the total order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// 0-based, gap-free position in the journal
    pub sequence: u64,
    pub event: RegistryEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = RegistryEvent::AccessGranted {
            resource_id: ResourceId::from_bytes([1; 32]),
            grantee_did: Did::from_bytes([2; 32]),
            granter_did: Did::from_bytes([3; 32]),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "access_granted");
        assert_eq!(value["grantee_did"], Did::from_bytes([2; 32]).to_hex());
        assert_eq!(event.kind(), "access_granted");
    }
}
