//! Identity registry: principal <-> DID bijection

use std::collections::HashMap;

use crate::error::{RegistryError, RegistryResult};
use crate::event::RegistryEvent;
use crate::identifier::{Did, Principal};

#[derive(Debug, Default)]
pub struct IdentityRegistry {
    /// principal -> did
    dids: HashMap<Principal, Did>,
    /// did -> principal
    principals: HashMap<Did, Principal>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered identities
    pub fn len(&self) -> usize {
        self.dids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dids.is_empty()
    }

    /// DID of `principal`, or [`Did::ZERO`] if it never registered
    pub fn get_identity(&self, principal: &Principal) -> Did {
        self.dids.get(principal).copied().unwrap_or(Did::ZERO)
    }

    /// Principal bound to `did`, or [`Principal::ZERO`] if unknown
    pub fn get_principal(&self, did: &Did) -> Principal {
        self.principals.get(did).copied().unwrap_or(Principal::ZERO)
    }

    pub fn is_registered(&self, did: &Did) -> bool {
        !did.is_zero() && self.principals.contains_key(did)
    }

    /// Validate a registration by `caller` and produce its event
    pub fn plan_register(&self, caller: &Principal) -> RegistryResult<RegistryEvent> {
        Ok(RegistryEvent::IdentityRegistered {
            principal: *caller,
            did: self.next_did(caller)?,
        })
    }

    fn next_did(&self, caller: &Principal) -> RegistryResult<Did> {
        if caller.is_zero() {
            return Err(RegistryError::InvalidIdentifier(
                "the zero principal cannot register".into(),
            ));
        }
        if self.dids.contains_key(caller) {
            return Err(RegistryError::AlreadyRegistered(*caller));
        }

        Ok(Did::derive(caller, self.dids.len() as u64))
    }

    /// Record a registration
    ///
    /// Re-checks every invariant so that journal replay rejects a log that
    /// could not have been produced by [`plan_register`](Self::plan_register).
    pub fn apply_registered(&mut self, principal: &Principal, did: &Did) -> RegistryResult<()> {
        let expected = self.next_did(principal)?;
        if expected != *did {
            return Err(RegistryError::CorruptJournal(format!(
                "DID {did} for {principal} does not match derivation {expected}"
            )));
        }
        if self.principals.contains_key(did) {
            return Err(RegistryError::CorruptJournal(format!(
                "DID {did} is already bound"
            )));
        }

        self.dids.insert(*principal, *did);
        self.principals.insert(*did, *principal);
        Ok(())
    }
}
