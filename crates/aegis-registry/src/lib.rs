//! aegis-registry: Identity, resource and access-grant registry
//!
//! Binds principals to decentralized identities (DIDs), records which
//! identity registered each content-addressed resource, and lets resource
//! owners grant and revoke access for other identities.
//!
//! ## Features
//!
//! | Feature  | Description                      |
//! |----------|----------------------------------|
//! | (none)   | In-memory journal only           |
//! | `sqlite` | SQLite event journal (default)   |
//!
//! ## Example
//!
//! ```rust,ignore
//! use aegis_registry::{Principal, Registry, RegistryConfig, ResourceId, ResourceMetadata};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Registry::in_memory(RegistryConfig::default());
//!
//!     let alice = Principal::from_hex("0xa1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1")?;
//!     let bob = Principal::from_hex("0xa2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2")?;
//!     let alice_did = registry.register_identity(&alice).await?;
//!     let bob_did = registry.register_identity(&bob).await?;
//!
//!     let file = ResourceId::from_content(b"encrypted content");
//!     registry
//!         .register_resource(&alice, &file, &alice_did, ResourceMetadata::default())
//!         .await?;
//!
//!     registry.grant_access(&alice, &file, &bob_did).await?;
//!     assert!(registry.has_access(&file, &bob_did).await);
//!
//!     Ok(())
//! }
//! ```

mod access;
mod clock;
mod error;
mod event;
mod identifier;
mod identity;
mod journal;
mod registry;
mod resource;
mod state;

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-exports
pub use access::{AccessControl, GrantRecord};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{RegistryError, RegistryResult};
pub use event::{EventRecord, RegistryEvent};
pub use identifier::{Did, Principal, ResourceId};
pub use identity::IdentityRegistry;
pub use journal::EventJournal;
pub use registry::{Registry, RegistryConfig};
pub use resource::{Analysis, ResourceMetadata, ResourceRecord, ResourceRegistry};
pub use state::RegistryState;

pub use memory::InMemoryJournal;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteJournal;
