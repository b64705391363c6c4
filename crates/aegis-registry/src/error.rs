//! Registry error types

use thiserror::Error;

use crate::identifier::{Did, Principal, ResourceId};

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Identity already registered for {0}")]
    AlreadyRegistered(Principal),

    #[error("Resource already registered: {0}")]
    AlreadyExists(ResourceId),

    #[error("Invalid owner identity: {0}")]
    InvalidOwner(Did),

    #[error("Resource not found: {0}")]
    NotFound(ResourceId),

    #[error("Only the owner of {0} can change its grants")]
    NotOwner(ResourceId),

    #[error("Grantee identity cannot be zero")]
    ZeroGrantee,

    #[error("Access to {resource} already granted to {grantee}")]
    AlreadyGranted { resource: ResourceId, grantee: Did },

    #[error("Access to {resource} not granted to {grantee}")]
    NotGranted { resource: ResourceId, grantee: Did },

    #[error("Not the registry administrator: {0}")]
    NotAdministrator(Principal),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Journal error: {0}")]
    Journal(String),

    #[error("Corrupt journal: {0}")]
    CorruptJournal(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl RegistryError {
    /// Stable machine-readable code for this error
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyRegistered(_) => "already_registered",
            Self::AlreadyExists(_) => "already_exists",
            Self::InvalidOwner(_) => "invalid_owner",
            Self::NotFound(_) => "not_found",
            Self::NotOwner(_) => "not_owner",
            Self::ZeroGrantee => "zero_grantee",
            Self::AlreadyGranted { .. } => "already_granted",
            Self::NotGranted { .. } => "not_granted",
            Self::NotAdministrator(_) => "not_administrator",
            Self::InvalidIdentifier(_) => "invalid_identifier",
            Self::Journal(_) => "journal",
            Self::CorruptJournal(_) => "corrupt_journal",
            Self::Serialization(_) => "serialization",
            #[cfg(feature = "sqlite")]
            Self::Database(_) => "database",
        }
    }
}
