//! Roadmap queries and commands.
//!
//! Every read enriches stored roadmaps into API cards: owner name, like count,
//! whether the requesting viewer liked it, and the dominant circle color.

use std::sync::Arc;

use api_protocol::{
    Circle, CircleInput, RoadmapCard, RoadmapSummary, responses::GetRoadmapResponse,
};
use entities::{LikeToggle, Roadmap, RoadmapCircle, dominant_color, sort_by_popularity};
use roadmap_store::{RoadmapStore, RoadmapStoreError};
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::services::summary::{SummaryJob, SummaryQueue};

/// Roadmap service over a store.
pub struct RoadmapService<S: RoadmapStore> {
    store: Arc<S>,
    summaries: SummaryQueue,
}

impl<S: RoadmapStore> RoadmapService<S> {
    /// Creates a new roadmap service.
    pub fn new(store: Arc<S>, summaries: SummaryQueue) -> Self {
        Self { store, summaries }
    }

    /// Returns cards for roadmaps whose title or summary contains `keyword`,
    /// most viewed first.
    pub async fn search_roadmaps(
        &self,
        keyword: &str,
        viewer: Option<Uuid>,
    ) -> ServerResult<Vec<RoadmapCard>> {
        let mut roadmaps = self.store.search_roadmaps(keyword.trim()).await?;
        sort_by_popularity(&mut roadmaps);
        self.cards(&roadmaps, viewer).await
    }

    /// Returns cards for every roadmap, most viewed first.
    pub async fn list_roadmaps(&self, viewer: Option<Uuid>) -> ServerResult<Vec<RoadmapCard>> {
        let roadmaps = self.store.list_roadmaps_by_view_desc().await?;
        self.cards(&roadmaps, viewer).await
    }

    /// Returns the display name of the requesting viewer, if any.
    pub async fn viewer_name(&self, viewer: Option<Uuid>) -> ServerResult<Option<String>> {
        let Some(user_id) = viewer else {
            return Ok(None);
        };
        Ok(self.store.get_user(user_id).await?.map(|user| user.name))
    }

    /// Records a view and returns the roadmap card with its circles.
    pub async fn get_roadmap_detail(
        &self,
        roadmap_id: Uuid,
        viewer: Option<Uuid>,
    ) -> ServerResult<GetRoadmapResponse> {
        let roadmap = self.store.increment_view(roadmap_id).await?;
        let circles = self.store.list_circles_by_roadmap(roadmap.id).await?;
        let summary = self.summarize(&roadmap, viewer).await?;

        let detail = GetRoadmapResponse {
            circles: circles
                .iter()
                .map(|circle| to_api_circle(circle, &summary))
                .collect(),
            roadmap: RoadmapCard {
                roadmap: summary,
                color: dominant_color(&circles),
            },
        };

        Ok(detail)
    }

    /// Creates a roadmap with its circles and queues its summary.
    pub async fn create_roadmap(
        &self,
        owner_id: Uuid,
        title: String,
        inputs: Vec<CircleInput>,
    ) -> ServerResult<Uuid> {
        if title.trim().is_empty() {
            return Err(ServerError::InvalidRequest(
                "Roadmap title must not be empty".to_string(),
            ));
        }

        self.store
            .get_user(owner_id)
            .await?
            .ok_or_else(|| RoadmapStoreError::not_found("User", owner_id.to_string()))?;

        let roadmap = Roadmap::new(owner_id, title);
        let circles = inputs
            .into_iter()
            .enumerate()
            .map(|(position, input)| {
                RoadmapCircle::new(
                    roadmap.id,
                    input.title,
                    input.date,
                    input.content,
                    input.level,
                    input.color_type,
                )
                .with_position(position as u32)
            })
            .collect();
        let (roadmap, circles) = self
            .store
            .create_roadmap_with_circles(roadmap, circles)
            .await?;

        tracing::info!(
            roadmap_id = %roadmap.id,
            user_id = %owner_id,
            circles = circles.len(),
            "Roadmap created"
        );

        let roadmap_id = roadmap.id;
        self.summaries.submit(SummaryJob { roadmap, circles });

        Ok(roadmap_id)
    }

    /// Likes the roadmap for `user_id`, or removes the like if present.
    ///
    /// Returns the new state and the like count after the toggle.
    pub async fn toggle_like(
        &self,
        roadmap_id: Uuid,
        user_id: Uuid,
    ) -> ServerResult<(LikeToggle, u64)> {
        let result = self.store.toggle_like(roadmap_id, user_id).await?;
        let likes = self.store.count_likes(roadmap_id).await?;

        tracing::info!(
            roadmap_id = %roadmap_id,
            user_id = %user_id,
            result = ?result,
            "Roadmap like toggled"
        );

        Ok((result, likes))
    }

    async fn cards(
        &self,
        roadmaps: &[Roadmap],
        viewer: Option<Uuid>,
    ) -> ServerResult<Vec<RoadmapCard>> {
        let mut cards = Vec::with_capacity(roadmaps.len());
        for roadmap in roadmaps {
            let circles = self.store.list_circles_by_roadmap(roadmap.id).await?;
            cards.push(RoadmapCard {
                roadmap: self.summarize(roadmap, viewer).await?,
                color: dominant_color(&circles),
            });
        }
        Ok(cards)
    }

    async fn summarize(
        &self,
        roadmap: &Roadmap,
        viewer: Option<Uuid>,
    ) -> ServerResult<RoadmapSummary> {
        let owner = self
            .store
            .get_user(roadmap.user_id)
            .await?
            .ok_or_else(|| {
                ServerError::Internal(format!("Owner of roadmap {} is missing", roadmap.id))
            })?;

        let likes = self.store.count_likes(roadmap.id).await?;
        let liked = match viewer {
            Some(user_id) => self.store.get_like(roadmap.id, user_id).await?.is_some(),
            None => false,
        };

        Ok(RoadmapSummary {
            roadmap_id: roadmap.id.to_string(),
            user_id: owner.id.to_string(),
            user_name: owner.name,
            view: roadmap.view_count(),
            title: roadmap.title.clone(),
            summary: roadmap.summary.clone(),
            likes,
            liked,
        })
    }
}

fn to_api_circle(circle: &RoadmapCircle, parent: &RoadmapSummary) -> Circle {
    Circle {
        circle_id: circle.id.to_string(),
        roadmap: parent.clone(),
        title: circle.title.clone(),
        date: circle.date,
        content: circle.content.clone(),
        level: circle.level,
        color_type: circle.color_type,
    }
}
