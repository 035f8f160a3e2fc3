//! Roadmap entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-authored learning plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roadmap {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user ID.
    pub user_id: Uuid,
    /// Roadmap title.
    pub title: String,
    /// View counter. Rows written before the counter existed carry `None`.
    pub view: Option<i64>,
    /// Generated summary, absent until the summary job lands.
    pub summary: Option<String>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Roadmap {
    /// Creates a new roadmap owned by `user_id`.
    pub fn new(user_id: Uuid, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            view: Some(0),
            summary: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the view count, treating a missing counter as zero.
    pub fn view_count(&self) -> i64 {
        self.view.unwrap_or(0)
    }

    /// Bumps the view counter by one.
    pub fn record_view(&mut self) {
        self.view = Some(self.view_count() + 1);
        self.updated_at = Utc::now();
    }

    /// Returns true if the title or summary contains `keyword`.
    ///
    /// Matching is a case-sensitive substring test; an empty keyword matches
    /// every roadmap.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        self.title.contains(keyword)
            || self
                .summary
                .as_deref()
                .is_some_and(|summary| summary.contains(keyword))
    }
}

/// Orders roadmaps by view count descending, oldest first among equal counts.
pub fn sort_by_popularity(roadmaps: &mut [Roadmap]) {
    roadmaps.sort_by(|a, b| {
        b.view_count()
            .cmp(&a.view_count())
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}
