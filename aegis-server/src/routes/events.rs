use crate::error::ServerResult;
use crate::state::AppState;
use aegis_registry::EventRecord;
use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub since: u64,
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub events: Vec<EventRecord>,
    pub next_sequence: u64,
}

/// GET /events?since=N
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> ServerResult<Json<EventsResponse>> {
    let events = state.registry.events_since(query.since).await?;
    let next_sequence = state.registry.next_sequence().await;

    Ok(Json(EventsResponse {
        events,
        next_sequence,
    }))
}
