//! Roadmap store trait definitions.

use async_trait::async_trait;
use entities::{LikeToggle, Roadmap, RoadmapCircle, RoadmapLike, User};
use uuid::Uuid;

use crate::RoadmapStoreResult;

/// Trait for roadmap storage operations.
///
/// Compound operations (`create_roadmap_with_circles`, `increment_view`,
/// `toggle_like`, `update_summary_if_absent`) run as a single unit in every
/// implementation.
/// Nothing coordinates across calls, so two concurrent toggles on the same
/// pair are resolved by whichever commits last.
#[async_trait]
pub trait RoadmapStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user.
    async fn create_user(&self, user: User) -> RoadmapStoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: Uuid) -> RoadmapStoreResult<Option<User>>;

    /// Gets a user by the provider's subject identifier.
    async fn get_user_by_social_id(&self, social_id: &str) -> RoadmapStoreResult<Option<User>>;

    // =========================================================================
    // Roadmap operations
    // =========================================================================

    /// Creates a roadmap together with its circles.
    ///
    /// Either everything is stored or nothing is. Fails with `NotFound` if the
    /// owner does not exist or a circle points at another roadmap, and with
    /// `AlreadyExists` on a duplicate id.
    async fn create_roadmap_with_circles(
        &self,
        roadmap: Roadmap,
        circles: Vec<RoadmapCircle>,
    ) -> RoadmapStoreResult<(Roadmap, Vec<RoadmapCircle>)>;

    /// Creates a roadmap without circles.
    async fn create_roadmap(&self, roadmap: Roadmap) -> RoadmapStoreResult<Roadmap> {
        let (roadmap, _) = self.create_roadmap_with_circles(roadmap, Vec::new()).await?;
        Ok(roadmap)
    }

    /// Gets a roadmap by ID.
    async fn get_roadmap(&self, id: Uuid) -> RoadmapStoreResult<Option<Roadmap>>;

    /// Lists all roadmaps, most viewed first.
    async fn list_roadmaps_by_view_desc(&self) -> RoadmapStoreResult<Vec<Roadmap>>;

    /// Lists roadmaps whose title or summary contains `keyword`.
    ///
    /// No particular order is guaranteed.
    async fn search_roadmaps(&self, keyword: &str) -> RoadmapStoreResult<Vec<Roadmap>>;

    /// Increments the view counter of a roadmap and returns the updated row.
    ///
    /// A missing counter counts as zero.
    async fn increment_view(&self, id: Uuid) -> RoadmapStoreResult<Roadmap>;

    /// Writes `summary` onto the roadmap if it does not have one yet.
    ///
    /// Returns false when the roadmap is gone or already summarized.
    async fn update_summary_if_absent(&self, id: Uuid, summary: &str) -> RoadmapStoreResult<bool>;

    // =========================================================================
    // Circle operations
    // =========================================================================

    /// Lists the circles of a roadmap in position order.
    async fn list_circles_by_roadmap(
        &self,
        roadmap_id: Uuid,
    ) -> RoadmapStoreResult<Vec<RoadmapCircle>>;

    // =========================================================================
    // Like operations
    // =========================================================================

    /// Gets the like a user left on a roadmap, if any.
    async fn get_like(
        &self,
        roadmap_id: Uuid,
        user_id: Uuid,
    ) -> RoadmapStoreResult<Option<RoadmapLike>>;

    /// Counts the likes on a roadmap.
    async fn count_likes(&self, roadmap_id: Uuid) -> RoadmapStoreResult<u64>;

    /// Creates the like if absent, removes it otherwise.
    ///
    /// Fails with `NotFound` if the user or roadmap does not exist and a like
    /// would be created.
    async fn toggle_like(&self, roadmap_id: Uuid, user_id: Uuid) -> RoadmapStoreResult<LikeToggle>;

    /// Deletes a like by ID.
    async fn delete_like(&self, id: Uuid) -> RoadmapStoreResult<()>;
}
