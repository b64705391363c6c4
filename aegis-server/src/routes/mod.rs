use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

mod access;
mod events;
mod health;
mod identities;
mod resources;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/identities", post(identities::register_identity))
        .route("/identities/{principal}", get(identities::get_identity))
        .route("/dids/{did}", get(identities::get_principal))
        .route("/dids/{did}/resources", get(resources::list_owned))
        .route("/dids/{did}/shared", get(access::list_shared_with))
        .route("/resources", post(resources::register_resource))
        .route("/resources/{id}", get(resources::get_resource))
        .route("/resources/{id}/owner", get(resources::get_owner))
        .route("/resources/{id}/exists", get(resources::exists))
        .route("/resources/{id}/analysis", put(resources::record_analysis))
        .route(
            "/resources/{id}/grants",
            get(access::list_grantees).post(access::grant_access),
        )
        .route(
            "/resources/{id}/grants/{did}",
            get(access::check_access).delete(access::revoke_access),
        )
        .route("/events", get(events::list_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
