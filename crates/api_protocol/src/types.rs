//! API type definitions.

use chrono::{DateTime, NaiveDate, Utc};
pub use entities::{ColorType, LikeToggle};
use serde::{Deserialize, Serialize};

/// User as exposed by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Roadmap with its owner, popularity and like metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapSummary {
    pub roadmap_id: String,
    pub user_id: String,
    pub user_name: String,
    pub view: i64,
    pub title: String,
    pub summary: Option<String>,
    pub likes: u64,
    /// Whether the requesting user liked this roadmap.
    pub liked: bool,
}

/// Roadmap summary paired with its dominant color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapCard {
    pub roadmap: RoadmapSummary,
    pub color: Option<ColorType>,
}

/// One milestone of a roadmap, with its parent embedded for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub circle_id: String,
    pub roadmap: RoadmapSummary,
    pub title: String,
    pub date: NaiveDate,
    pub content: String,
    pub level: u32,
    pub color_type: ColorType,
}

/// Milestone supplied when creating a roadmap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleInput {
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub content: String,
    pub level: u32,
    pub color_type: ColorType,
}
