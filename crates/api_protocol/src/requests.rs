//! API request types.

use serde::{Deserialize, Serialize};

use crate::types::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRoadmapsRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRoadmapsRequest {
    #[serde(default)]
    pub keyword: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRoadmapRequest {
    pub roadmap_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoadmapRequest {
    pub title: String,
    #[serde(default)]
    pub circles: Vec<CircleInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleLikeRequest {
    pub roadmap_id: String,
}
