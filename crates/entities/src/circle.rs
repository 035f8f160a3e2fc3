//! Roadmap circle (milestone) entity definitions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ColorType;

/// One dated milestone within a roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapCircle {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning roadmap ID.
    pub roadmap_id: Uuid,
    /// Milestone title.
    pub title: String,
    /// Milestone date.
    pub date: NaiveDate,
    /// Free-text content.
    pub content: String,
    /// Level of the milestone.
    pub level: u32,
    /// Color tag.
    pub color_type: ColorType,
    /// Position within the roadmap, in creation order.
    pub position: u32,
}

impl RoadmapCircle {
    /// Creates a new circle belonging to `roadmap_id`.
    pub fn new(
        roadmap_id: Uuid,
        title: impl Into<String>,
        date: NaiveDate,
        content: impl Into<String>,
        level: u32,
        color_type: ColorType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            roadmap_id,
            title: title.into(),
            date,
            content: content.into(),
            level,
            color_type,
            position: 0,
        }
    }

    /// Sets the position of this circle.
    pub fn with_position(mut self, position: u32) -> Self {
        self.position = position;
        self
    }
}
