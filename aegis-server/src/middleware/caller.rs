use crate::error::{ServerError, ServerResult};
use aegis_registry::{Principal, RegistryError};
use axum::{extract::FromRequestParts, http::request::Parts};
use std::str::FromStr;

/// Header carrying the authenticated caller address
///
/// The wallet/transport layer in front of this server authenticates the
/// caller; the value is trusted as given.
pub const PRINCIPAL_HEADER: &str = "X-Principal";

/// Caller principal of a mutating request
#[derive(Clone, Copy, Debug)]
pub struct Caller(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ServerError::BadRequest(format!("Missing {PRINCIPAL_HEADER} header")))?;

        let principal = Principal::from_hex(value)
            .map_err(|e| ServerError::BadRequest(format!("Invalid {PRINCIPAL_HEADER}: {e}")))?;

        Ok(Caller(principal))
    }
}

/// Parse an identifier from a path segment or body field
pub fn parse_param<T>(value: &str) -> ServerResult<T>
where
    T: FromStr<Err = RegistryError>,
{
    value.parse().map_err(ServerError::from)
}
