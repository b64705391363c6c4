use crate::error::ServerResult;
use crate::middleware::{Caller, parse_param};
use crate::state::AppState;
use aegis_registry::{Did, Principal};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct IdentityResponse {
    pub principal: Principal,
    pub did: Did,
    pub registered: bool,
}

/// POST /identities
pub async fn register_identity(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ServerResult<(StatusCode, Json<IdentityResponse>)> {
    let did = state.registry.register_identity(&caller).await?;
    tracing::debug!("Registered {} as {}", caller, did);

    Ok((
        StatusCode::CREATED,
        Json(IdentityResponse {
            principal: caller,
            did,
            registered: true,
        }),
    ))
}

/// GET /identities/{principal}
///
/// Unregistered principals resolve to the zero DID rather than 404.
pub async fn get_identity(
    State(state): State<AppState>,
    Path(principal): Path<String>,
) -> ServerResult<Json<IdentityResponse>> {
    let principal: Principal = parse_param(&principal)?;
    let did = state.registry.get_identity(&principal).await;

    Ok(Json(IdentityResponse {
        principal,
        did,
        registered: !did.is_zero(),
    }))
}

/// GET /dids/{did}
pub async fn get_principal(
    State(state): State<AppState>,
    Path(did): Path<String>,
) -> ServerResult<Json<IdentityResponse>> {
    let did: Did = parse_param(&did)?;
    let principal = state.registry.get_principal(&did).await;

    Ok(Json(IdentityResponse {
        principal,
        did,
        registered: !principal.is_zero(),
    }))
}
