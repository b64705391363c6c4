use crate::error::ServerResult;
use crate::middleware::{Caller, parse_param};
use crate::state::AppState;
use aegis_registry::{Analysis, Did, ResourceId, ResourceMetadata, ResourceRecord};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct RegisterResourceRequest {
    pub resource_id: String,
    pub owner_did: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content_uri: Option<String>,
}

#[derive(Serialize)]
pub struct ResourceResponse {
    #[serde(flatten)]
    pub record: ResourceRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
}

#[derive(Serialize)]
pub struct OwnerResponse {
    pub resource_id: ResourceId,
    pub owner_did: Did,
}

#[derive(Serialize)]
pub struct ExistsResponse {
    pub resource_id: ResourceId,
    pub exists: bool,
}

#[derive(Serialize)]
pub struct OwnedResponse {
    pub owner_did: Did,
    pub resources: Vec<ResourceId>,
}

#[derive(Deserialize)]
pub struct AnalysisRequest {
    pub result: String,
}

/// POST /resources
pub async fn register_resource(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<RegisterResourceRequest>,
) -> ServerResult<(StatusCode, Json<ResourceRecord>)> {
    let resource_id: ResourceId = parse_param(&req.resource_id)?;
    let owner: Did = parse_param(&req.owner_did)?;
    let metadata = ResourceMetadata {
        name: req.name,
        content_uri: req.content_uri,
    };

    let record = state
        .registry
        .register_resource(&caller, &resource_id, &owner, metadata)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /resources/{id}
pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<ResourceResponse>> {
    let resource_id: ResourceId = parse_param(&id)?;
    let record = state.registry.resource(&resource_id).await?;
    let analysis = state.registry.analysis(&resource_id).await;

    Ok(Json(ResourceResponse { record, analysis }))
}

/// GET /resources/{id}/owner
pub async fn get_owner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<OwnerResponse>> {
    let resource_id: ResourceId = parse_param(&id)?;
    let owner_did = state.registry.get_owner(&resource_id).await?;

    Ok(Json(OwnerResponse {
        resource_id,
        owner_did,
    }))
}

/// GET /resources/{id}/exists
pub async fn exists(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<ExistsResponse>> {
    let resource_id: ResourceId = parse_param(&id)?;
    let exists = state.registry.exists(&resource_id).await;

    Ok(Json(ExistsResponse {
        resource_id,
        exists,
    }))
}

/// GET /dids/{did}/resources
pub async fn list_owned(
    State(state): State<AppState>,
    Path(did): Path<String>,
) -> ServerResult<Json<OwnedResponse>> {
    let owner_did: Did = parse_param(&did)?;
    let resources = state.registry.resources_owned_by(&owner_did).await;

    Ok(Json(OwnedResponse {
        owner_did,
        resources,
    }))
}

/// PUT /resources/{id}/analysis
pub async fn record_analysis(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Json(req): Json<AnalysisRequest>,
) -> ServerResult<Json<Analysis>> {
    let resource_id: ResourceId = parse_param(&id)?;
    let analysis = state
        .registry
        .record_analysis(&caller, &resource_id, req.result)
        .await?;

    Ok(Json(analysis))
}
