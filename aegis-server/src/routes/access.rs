use crate::error::ServerResult;
use crate::middleware::{Caller, parse_param};
use crate::state::AppState;
use aegis_registry::{Did, ResourceId};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct GrantRequest {
    pub grantee_did: String,
}

#[derive(Serialize)]
pub struct AccessResponse {
    pub resource_id: ResourceId,
    pub grantee_did: Did,
    pub has_access: bool,
}

#[derive(Serialize)]
pub struct GranteesResponse {
    pub resource_id: ResourceId,
    pub grantees: Vec<Did>,
}

#[derive(Serialize)]
pub struct SharedResponse {
    pub grantee_did: Did,
    pub resources: Vec<ResourceId>,
}

/// POST /resources/{id}/grants
pub async fn grant_access(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Json(req): Json<GrantRequest>,
) -> ServerResult<(StatusCode, Json<AccessResponse>)> {
    let resource_id: ResourceId = parse_param(&id)?;
    let grantee_did: Did = parse_param(&req.grantee_did)?;

    state
        .registry
        .grant_access(&caller, &resource_id, &grantee_did)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AccessResponse {
            resource_id,
            grantee_did,
            has_access: true,
        }),
    ))
}

/// DELETE /resources/{id}/grants/{did}
pub async fn revoke_access(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path((id, did)): Path<(String, String)>,
) -> ServerResult<StatusCode> {
    let resource_id: ResourceId = parse_param(&id)?;
    let grantee_did: Did = parse_param(&did)?;

    state
        .registry
        .revoke_access(&caller, &resource_id, &grantee_did)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /resources/{id}/grants/{did}
///
/// Never fails for unknown resources or identities; answers `false`.
pub async fn check_access(
    State(state): State<AppState>,
    Path((id, did)): Path<(String, String)>,
) -> ServerResult<Json<AccessResponse>> {
    let resource_id: ResourceId = parse_param(&id)?;
    let grantee_did: Did = parse_param(&did)?;
    let has_access = state.registry.has_access(&resource_id, &grantee_did).await;

    Ok(Json(AccessResponse {
        resource_id,
        grantee_did,
        has_access,
    }))
}

/// GET /resources/{id}/grants
pub async fn list_grantees(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<GranteesResponse>> {
    let resource_id: ResourceId = parse_param(&id)?;
    let grantees = state.registry.grantees(&resource_id).await;

    Ok(Json(GranteesResponse {
        resource_id,
        grantees,
    }))
}

/// GET /dids/{did}/shared
pub async fn list_shared_with(
    State(state): State<AppState>,
    Path(did): Path<String>,
) -> ServerResult<Json<SharedResponse>> {
    let grantee_did: Did = parse_param(&did)?;
    let resources = state.registry.shared_with(&grantee_did).await;

    Ok(Json(SharedResponse {
        grantee_did,
        resources,
    }))
}
