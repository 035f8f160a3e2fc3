//! In-memory roadmap store implementation.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use entities::{sort_by_popularity, LikeToggle, Roadmap, RoadmapCircle, RoadmapLike, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{RoadmapStore, RoadmapStoreError, RoadmapStoreResult};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    roadmaps: HashMap<Uuid, Roadmap>,
    circles: HashMap<Uuid, RoadmapCircle>,
    likes: HashMap<Uuid, RoadmapLike>,
}

/// In-memory roadmap store.
///
/// All tables sit behind one lock so compound operations see a consistent
/// snapshot, the same way a transaction would.
#[derive(Debug, Default, Clone)]
pub struct MemoryRoadmapStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryRoadmapStore {
    /// Creates a new in-memory roadmap store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoadmapStore for MemoryRoadmapStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> RoadmapStoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) {
            return Err(RoadmapStoreError::already_exists("User", user.id.to_string()));
        }
        if tables.users.values().any(|u| u.social_id == user.social_id) {
            return Err(RoadmapStoreError::already_exists("User", user.social_id));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> RoadmapStoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn get_user_by_social_id(&self, social_id: &str) -> RoadmapStoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.social_id == social_id)
            .cloned())
    }

    // =========================================================================
    // Roadmap operations
    // =========================================================================

    async fn create_roadmap_with_circles(
        &self,
        roadmap: Roadmap,
        circles: Vec<RoadmapCircle>,
    ) -> RoadmapStoreResult<(Roadmap, Vec<RoadmapCircle>)> {
        let mut tables = self.tables.write().await;
        if tables.roadmaps.contains_key(&roadmap.id) {
            return Err(RoadmapStoreError::already_exists(
                "Roadmap",
                roadmap.id.to_string(),
            ));
        }
        if !tables.users.contains_key(&roadmap.user_id) {
            return Err(RoadmapStoreError::not_found(
                "User",
                roadmap.user_id.to_string(),
            ));
        }

        // Validate the whole batch before touching any table.
        let mut seen = HashSet::with_capacity(circles.len());
        for circle in &circles {
            if circle.roadmap_id != roadmap.id {
                return Err(RoadmapStoreError::not_found(
                    "Roadmap",
                    circle.roadmap_id.to_string(),
                ));
            }
            if tables.circles.contains_key(&circle.id) || !seen.insert(circle.id) {
                return Err(RoadmapStoreError::already_exists(
                    "RoadmapCircle",
                    circle.id.to_string(),
                ));
            }
        }

        tables.roadmaps.insert(roadmap.id, roadmap.clone());
        for circle in &circles {
            tables.circles.insert(circle.id, circle.clone());
        }
        Ok((roadmap, circles))
    }

    async fn get_roadmap(&self, id: Uuid) -> RoadmapStoreResult<Option<Roadmap>> {
        let tables = self.tables.read().await;
        Ok(tables.roadmaps.get(&id).cloned())
    }

    async fn list_roadmaps_by_view_desc(&self) -> RoadmapStoreResult<Vec<Roadmap>> {
        let tables = self.tables.read().await;
        let mut result: Vec<Roadmap> = tables.roadmaps.values().cloned().collect();
        sort_by_popularity(&mut result);
        Ok(result)
    }

    async fn search_roadmaps(&self, keyword: &str) -> RoadmapStoreResult<Vec<Roadmap>> {
        let tables = self.tables.read().await;
        Ok(tables
            .roadmaps
            .values()
            .filter(|r| r.matches_keyword(keyword))
            .cloned()
            .collect())
    }

    async fn increment_view(&self, id: Uuid) -> RoadmapStoreResult<Roadmap> {
        let mut tables = self.tables.write().await;
        let roadmap = tables
            .roadmaps
            .get_mut(&id)
            .ok_or_else(|| RoadmapStoreError::not_found("Roadmap", id.to_string()))?;
        roadmap.record_view();
        Ok(roadmap.clone())
    }

    async fn update_summary_if_absent(&self, id: Uuid, summary: &str) -> RoadmapStoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.roadmaps.get_mut(&id) {
            Some(roadmap) if roadmap.summary.is_none() => {
                roadmap.summary = Some(summary.to_string());
                roadmap.updated_at = chrono::Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    // =========================================================================
    // Circle operations
    // =========================================================================

    async fn list_circles_by_roadmap(
        &self,
        roadmap_id: Uuid,
    ) -> RoadmapStoreResult<Vec<RoadmapCircle>> {
        let tables = self.tables.read().await;
        let mut result: Vec<RoadmapCircle> = tables
            .circles
            .values()
            .filter(|c| c.roadmap_id == roadmap_id)
            .cloned()
            .collect();
        result.sort_by_key(|c| c.position);
        Ok(result)
    }

    // =========================================================================
    // Like operations
    // =========================================================================

    async fn get_like(
        &self,
        roadmap_id: Uuid,
        user_id: Uuid,
    ) -> RoadmapStoreResult<Option<RoadmapLike>> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .values()
            .find(|l| l.roadmap_id == roadmap_id && l.user_id == user_id)
            .cloned())
    }

    async fn count_likes(&self, roadmap_id: Uuid) -> RoadmapStoreResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .values()
            .filter(|l| l.roadmap_id == roadmap_id)
            .count() as u64)
    }

    async fn toggle_like(&self, roadmap_id: Uuid, user_id: Uuid) -> RoadmapStoreResult<LikeToggle> {
        let mut tables = self.tables.write().await;

        let existing = tables
            .likes
            .values()
            .find(|l| l.roadmap_id == roadmap_id && l.user_id == user_id)
            .map(|l| l.id);

        if let Some(like_id) = existing {
            tables.likes.remove(&like_id);
            return Ok(LikeToggle::Unliked);
        }

        if !tables.users.contains_key(&user_id) {
            return Err(RoadmapStoreError::not_found("User", user_id.to_string()));
        }
        if !tables.roadmaps.contains_key(&roadmap_id) {
            return Err(RoadmapStoreError::not_found(
                "Roadmap",
                roadmap_id.to_string(),
            ));
        }

        let like = RoadmapLike::new(user_id, roadmap_id);
        tables.likes.insert(like.id, like);
        Ok(LikeToggle::Liked)
    }

    async fn delete_like(&self, id: Uuid) -> RoadmapStoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.likes.remove(&id).is_none() {
            return Err(RoadmapStoreError::not_found("RoadmapLike", id.to_string()));
        }
        Ok(())
    }
}
