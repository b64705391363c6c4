//! Fixed-size identifiers: principals, DIDs and resource ids
//!
//! All three are opaque byte arrays rendered as `0x`-prefixed lowercase hex.
//! The all-zero value of each type is the sentinel meaning "none".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{RegistryError, RegistryResult};

const DID_DOMAIN: &[u8] = b"aegis.did.v1";

/// Authenticated caller of an operation (a wallet account address)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Principal([u8; 20]);

/// Decentralized identity handle bound to exactly one principal
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Did([u8; 32]);

/// Caller-supplied key of a registered resource, usually a content fingerprint
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId([u8; 32]);

macro_rules! fixed_identifier {
    ($name:ident, $len:expr, $label:literal) => {
        impl $name {
            pub const ZERO: Self = Self([0u8; $len]);

            pub const fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; $len]
            }

            /// Parse from hex, with or without a `0x` prefix
            pub fn from_hex(s: &str) -> RegistryResult<Self> {
                decode_fixed::<$len>(s, $label).map(Self)
            }

            pub fn to_hex(&self) -> String {
                format!("0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), &self.to_hex()[..10])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = RegistryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

fixed_identifier!(Principal, 20, "principal");
fixed_identifier!(Did, 32, "did");
fixed_identifier!(ResourceId, 32, "resource id");

fn decode_fixed<const N: usize>(s: &str, label: &str) -> RegistryResult<[u8; N]> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(digits)
        .map_err(|e| RegistryError::InvalidIdentifier(format!("{label} {s:?}: {e}")))?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        RegistryError::InvalidIdentifier(format!("{label} {s:?}: expected {N} bytes, got {len}"))
    })
}

impl Did {
    /// Derive the DID for the `sequence`-th identity registration
    ///
    /// Any observer of the event log can recompute this value.
    pub fn derive(principal: &Principal, sequence: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(DID_DOMAIN);
        hasher.update(principal.as_bytes());
        hasher.update(&sequence.to_le_bytes());
        Self(*hasher.finalize().as_bytes())
    }
}

impl ResourceId {
    /// Fingerprint of raw content bytes (Blake3)
    pub fn from_content(content: &[u8]) -> Self {
        Self(*blake3::hash(content).as_bytes())
    }

    /// Encode a short label as a left-aligned, zero-padded 32-byte value
    ///
    /// The last byte is reserved as a terminator, so labels are limited to 31 bytes.
    pub fn from_label(label: &str) -> RegistryResult<Self> {
        let raw = label.as_bytes();
        if raw.len() > 31 {
            return Err(RegistryError::InvalidIdentifier(format!(
                "label {label:?} is longer than 31 bytes"
            )));
        }
        let mut bytes = [0u8; 32];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self(bytes))
    }
}
