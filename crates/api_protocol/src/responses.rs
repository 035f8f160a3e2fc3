//! API response types.

use serde::{Deserialize, Serialize};

use crate::types::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRoadmapsResponse {
    pub roadmaps: Vec<RoadmapCard>,
    /// Name of the authenticated caller, absent for anonymous requests.
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRoadmapsResponse {
    pub roadmaps: Vec<RoadmapCard>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRoadmapResponse {
    pub roadmap: RoadmapCard,
    pub circles: Vec<Circle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoadmapResponse {
    pub roadmap_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleLikeResponse {
    pub result: LikeToggle,
    pub likes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCurrentUserResponse {
    pub user: User,
}
