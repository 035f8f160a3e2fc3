//! Roadmap API endpoints.

use std::sync::Arc;

use api_protocol::{requests::*, responses::*};
use axum::{Extension, Json, extract::State};
use roadmap_store::RoadmapStore;
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;

fn parse_roadmap_id(raw: &str) -> ServerResult<Uuid> {
    raw.parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid roadmap_id".to_string()))
}

fn viewer(user: Option<Extension<AuthenticatedUser>>) -> Option<Uuid> {
    user.map(|Extension(user)| user.id)
}

/// Lists all roadmaps, most viewed first.
pub async fn list_roadmaps<S: RoadmapStore>(
    State(state): State<Arc<AppState<S>>>,
    user: Option<Extension<AuthenticatedUser>>,
    Json(_request): Json<ListRoadmapsRequest>,
) -> ServerResult<Json<ListRoadmapsResponse>> {
    let viewer = viewer(user);
    let roadmaps = state.roadmaps.list_roadmaps(viewer).await?;
    let user_name = state.roadmaps.viewer_name(viewer).await?;

    Ok(Json(ListRoadmapsResponse {
        roadmaps,
        user_name,
    }))
}

/// Searches roadmaps by title or summary.
pub async fn search_roadmaps<S: RoadmapStore>(
    State(state): State<Arc<AppState<S>>>,
    user: Option<Extension<AuthenticatedUser>>,
    Json(request): Json<SearchRoadmapsRequest>,
) -> ServerResult<Json<SearchRoadmapsResponse>> {
    let roadmaps = state
        .roadmaps
        .search_roadmaps(&request.keyword, viewer(user))
        .await?;

    Ok(Json(SearchRoadmapsResponse { roadmaps }))
}

/// Gets a roadmap with its circles. Each call counts as a view.
pub async fn get_roadmap<S: RoadmapStore>(
    State(state): State<Arc<AppState<S>>>,
    user: Option<Extension<AuthenticatedUser>>,
    Json(request): Json<GetRoadmapRequest>,
) -> ServerResult<Json<GetRoadmapResponse>> {
    let roadmap_id = parse_roadmap_id(&request.roadmap_id)?;

    let detail = state
        .roadmaps
        .get_roadmap_detail(roadmap_id, viewer(user))
        .await?;

    Ok(Json(detail))
}

/// Creates a roadmap owned by the caller.
pub async fn create_roadmap<S: RoadmapStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateRoadmapRequest>,
) -> ServerResult<Json<CreateRoadmapResponse>> {
    let roadmap_id = state
        .roadmaps
        .create_roadmap(user.id, request.title, request.circles)
        .await?;

    Ok(Json(CreateRoadmapResponse {
        roadmap_id: roadmap_id.to_string(),
    }))
}

/// Likes or unlikes a roadmap for the caller.
pub async fn toggle_like<S: RoadmapStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<ToggleLikeRequest>,
) -> ServerResult<Json<ToggleLikeResponse>> {
    let roadmap_id = parse_roadmap_id(&request.roadmap_id)?;

    let (result, likes) = state.roadmaps.toggle_like(roadmap_id, user.id).await?;

    Ok(Json(ToggleLikeResponse { result, likes }))
}
