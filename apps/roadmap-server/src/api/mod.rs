//! API endpoints.

pub mod auth;
pub mod roadmap;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use roadmap_store::RoadmapStore;

use crate::middleware::{auth_middleware, optional_auth_middleware};
use crate::state::AppState;

/// Creates the API router with all endpoints.
///
/// Roadmap reads accept anonymous callers; writes and `/api/auth/me` require a
/// bearer token.
pub fn create_router<S: RoadmapStore + 'static>(
    state: Arc<AppState<S>>,
) -> Router<Arc<AppState<S>>> {
    let authenticated = Router::new()
        .route("/api/roadmap/create", post(roadmap::create_roadmap))
        .route("/api/roadmap/like", post(roadmap::toggle_like))
        .route("/api/auth/me", get(auth::get_current_user))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<S>,
        ));

    let public = Router::new()
        .route("/api/roadmap/list", post(roadmap::list_roadmaps))
        .route("/api/roadmap/search", post(roadmap::search_roadmaps))
        .route("/api/roadmap/get", post(roadmap::get_roadmap))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            optional_auth_middleware::<S>,
        ));

    Router::new()
        .merge(authenticated)
        .merge(public)
        // Login flow
        .route("/oauth2/authorization/kakao", get(auth::start_login))
        .route("/login/oauth2/code/kakao", get(auth::handle_callback))
        // Health check
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
