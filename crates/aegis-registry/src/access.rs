//! Access control: grants from a resource owner to other identities
//!
//! Each `(resource, grantee)` pair is either absent or granted. Granting an
//! absent pair and revoking a granted one are the only transitions; both
//! self-loops are rejected so callers always learn the exact prior state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};
use crate::event::RegistryEvent;
use crate::identifier::{Did, Principal, ResourceId};
use crate::identity::IdentityRegistry;
use crate::resource::ResourceRegistry;

/// A live grant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRecord {
    pub resource_id: ResourceId,
    pub grantee_did: Did,
    /// Owner identity that issued the grant
    pub granter_did: Did,
}

#[derive(Debug, Default)]
pub struct AccessControl {
    /// (resource_id, grantee) -> grant
    grants: HashMap<(ResourceId, Did), GrantRecord>,
}

impl AccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live grants
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Whether `grantee` currently holds a grant on `resource_id`
    ///
    /// Never fails: unknown resources and identities simply have no grant.
    /// The owner holds no implicit grant.
    pub fn has_access(&self, resource_id: &ResourceId, grantee: &Did) -> bool {
        self.grants.contains_key(&(*resource_id, *grantee))
    }

    /// Grantees of `resource_id`, sorted
    pub fn grantees(&self, resource_id: &ResourceId) -> Vec<Did> {
        let mut dids: Vec<Did> = self
            .grants
            .keys()
            .filter(|(r, _)| r == resource_id)
            .map(|(_, g)| *g)
            .collect();
        dids.sort();
        dids
    }

    /// Resources shared with `grantee`, sorted
    pub fn shared_with(&self, grantee: &Did) -> Vec<ResourceId> {
        let mut resources: Vec<ResourceId> = self
            .grants
            .keys()
            .filter(|(_, g)| g == grantee)
            .map(|(r, _)| *r)
            .collect();
        resources.sort();
        resources
    }

    /// Validate a grant by `caller` and produce its event
    pub fn plan_grant(
        &self,
        identities: &IdentityRegistry,
        resources: &ResourceRegistry,
        caller: &Principal,
        resource_id: &ResourceId,
        grantee: &Did,
    ) -> RegistryResult<RegistryEvent> {
        let granter = owner_as_caller(identities, resources, caller, resource_id)?;
        if grantee.is_zero() {
            return Err(RegistryError::ZeroGrantee);
        }
        if self.has_access(resource_id, grantee) {
            return Err(RegistryError::AlreadyGranted {
                resource: *resource_id,
                grantee: *grantee,
            });
        }

        Ok(RegistryEvent::AccessGranted {
            resource_id: *resource_id,
            grantee_did: *grantee,
            granter_did: granter,
        })
    }

    /// Validate a revocation by `caller` and produce its event
    ///
    /// A zero grantee can never have been granted, so it fails with
    /// [`RegistryError::NotGranted`] rather than [`RegistryError::ZeroGrantee`].
    pub fn plan_revoke(
        &self,
        identities: &IdentityRegistry,
        resources: &ResourceRegistry,
        caller: &Principal,
        resource_id: &ResourceId,
        grantee: &Did,
    ) -> RegistryResult<RegistryEvent> {
        let revoker = owner_as_caller(identities, resources, caller, resource_id)?;
        if !self.has_access(resource_id, grantee) {
            return Err(RegistryError::NotGranted {
                resource: *resource_id,
                grantee: *grantee,
            });
        }

        Ok(RegistryEvent::AccessRevoked {
            resource_id: *resource_id,
            grantee_did: *grantee,
            revoker_did: revoker,
        })
    }

    /// Record a grant, re-checking the invariants of [`plan_grant`](Self::plan_grant)
    pub fn apply_granted(
        &mut self,
        resources: &ResourceRegistry,
        grant: GrantRecord,
    ) -> RegistryResult<()> {
        if resources.get_owner(&grant.resource_id)? != grant.granter_did {
            return Err(RegistryError::NotOwner(grant.resource_id));
        }
        if grant.grantee_did.is_zero() {
            return Err(RegistryError::ZeroGrantee);
        }

        let key = (grant.resource_id, grant.grantee_did);
        if self.grants.contains_key(&key) {
            return Err(RegistryError::AlreadyGranted {
                resource: grant.resource_id,
                grantee: grant.grantee_did,
            });
        }
        self.grants.insert(key, grant);
        Ok(())
    }

    /// Remove a grant, re-checking the invariants of [`plan_revoke`](Self::plan_revoke)
    pub fn apply_revoked(
        &mut self,
        resources: &ResourceRegistry,
        resource_id: &ResourceId,
        grantee: &Did,
        revoker: &Did,
    ) -> RegistryResult<()> {
        if resources.get_owner(resource_id)? != *revoker {
            return Err(RegistryError::NotOwner(*resource_id));
        }

        self.grants
            .remove(&(*resource_id, *grantee))
            .map(|_| ())
            .ok_or(RegistryError::NotGranted {
                resource: *resource_id,
                grantee: *grantee,
            })
    }
}

/// Resolve the resource owner and require that `caller` is it
fn owner_as_caller(
    identities: &IdentityRegistry,
    resources: &ResourceRegistry,
    caller: &Principal,
    resource_id: &ResourceId,
) -> RegistryResult<Did> {
    let owner = resources.get_owner(resource_id)?;
    let caller_did = identities.get_identity(caller);
    if caller_did != owner {
        return Err(RegistryError::NotOwner(*resource_id));
    }
    Ok(owner)
}
