//! Like entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's endorsement of a roadmap. At most one per (user, roadmap) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapLike {
    /// Unique identifier.
    pub id: Uuid,
    /// User who liked the roadmap.
    pub user_id: Uuid,
    /// Liked roadmap.
    pub roadmap_id: Uuid,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl RoadmapLike {
    /// Creates a new like.
    pub fn new(user_id: Uuid, roadmap_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            roadmap_id,
            created_at: Utc::now(),
        }
    }
}

/// Outcome of toggling a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeToggle {
    /// A like record was created.
    Liked,
    /// The existing like record was removed.
    Unliked,
}

