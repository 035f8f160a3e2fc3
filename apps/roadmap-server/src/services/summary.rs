//! Background roadmap summaries.
//!
//! Roadmap creation hands a job to [`SummaryQueue`] and returns immediately.
//! A worker task runs each job against the configured [`SummaryGenerator`]
//! and writes the text back with a compare-and-write update. Failures are
//! logged and dropped: the roadmap simply keeps an absent summary, and no
//! retry is attempted. Readers may see the roadmap before its summary lands.

use std::sync::Arc;

use async_trait::async_trait;
use entities::{Roadmap, RoadmapCircle};
use roadmap_store::RoadmapStore;
use tokio::sync::mpsc;

/// Errors returned by a summary generator.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream service answered with a non-success status.
    #[error("Summary service returned {status}")]
    Upstream { status: u16 },

    /// The response contained no usable text.
    #[error("Summary response had no text")]
    EmptyResponse,
}

/// Produces a short text summary of a roadmap.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn summarize(
        &self,
        roadmap: &Roadmap,
        circles: &[RoadmapCircle],
    ) -> Result<String, SummaryError>;
}

/// A roadmap waiting for its summary.
#[derive(Debug, Clone)]
pub struct SummaryJob {
    pub roadmap: Roadmap,
    pub circles: Vec<RoadmapCircle>,
}

/// What happened to a summary job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// The summary was written onto the roadmap.
    Written,
    /// The roadmap was gone or already had a summary.
    Skipped,
    /// Generation or persistence failed; the summary stays absent.
    Dropped,
}

/// Handle for submitting summary jobs.
#[derive(Debug, Clone)]
pub struct SummaryQueue {
    sender: Option<mpsc::UnboundedSender<SummaryJob>>,
}

impl SummaryQueue {
    /// Starts the worker task and returns a handle to it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<S: RoadmapStore + 'static>(
        store: Arc<S>,
        generator: Arc<dyn SummaryGenerator>,
    ) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<SummaryJob>();

        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                let store = store.clone();
                let generator = generator.clone();
                tokio::spawn(async move {
                    run_job(store.as_ref(), generator.as_ref(), job).await;
                });
            }
            tracing::debug!("Summary queue closed");
        });

        Self {
            sender: Some(sender),
        }
    }

    /// A queue that drops every job.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Returns true if jobs are processed.
    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Submits a job without waiting for it.
    pub fn submit(&self, job: SummaryJob) {
        let roadmap_id = job.roadmap.id;
        match &self.sender {
            Some(sender) => {
                if sender.send(job).is_err() {
                    tracing::warn!(roadmap_id = %roadmap_id, "Summary worker is gone, job dropped");
                }
            }
            None => {
                tracing::debug!(roadmap_id = %roadmap_id, "Summaries disabled, job dropped");
            }
        }
    }
}

/// Runs one summary job to completion.
pub async fn run_job<S: RoadmapStore + ?Sized>(
    store: &S,
    generator: &dyn SummaryGenerator,
    job: SummaryJob,
) -> SummaryOutcome {
    let roadmap_id = job.roadmap.id;

    let summary = match generator.summarize(&job.roadmap, &job.circles).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!(roadmap_id = %roadmap_id, error = %e, "Summary generation failed");
            return SummaryOutcome::Dropped;
        }
    };

    match store.update_summary_if_absent(roadmap_id, &summary).await {
        Ok(true) => {
            tracing::info!(roadmap_id = %roadmap_id, "Roadmap summary stored");
            SummaryOutcome::Written
        }
        Ok(false) => {
            tracing::debug!(roadmap_id = %roadmap_id, "Roadmap summary not needed");
            SummaryOutcome::Skipped
        }
        Err(e) => {
            tracing::warn!(roadmap_id = %roadmap_id, error = %e, "Failed to store roadmap summary");
            SummaryOutcome::Dropped
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use entities::User;
    use roadmap_store::MemoryRoadmapStore;

    use super::*;

    struct FixedSummary(&'static str);

    #[async_trait]
    impl SummaryGenerator for FixedSummary {
        async fn summarize(
            &self,
            roadmap: &Roadmap,
            circles: &[RoadmapCircle],
        ) -> Result<String, SummaryError> {
            Ok(format!("{}: {} ({} steps)", self.0, roadmap.title, circles.len()))
        }
    }

    struct FailingSummary;

    #[async_trait]
    impl SummaryGenerator for FailingSummary {
        async fn summarize(
            &self,
            _roadmap: &Roadmap,
            _circles: &[RoadmapCircle],
        ) -> Result<String, SummaryError> {
            Err(SummaryError::EmptyResponse)
        }
    }

    async fn seeded() -> (MemoryRoadmapStore, Roadmap) {
        let store = MemoryRoadmapStore::new();
        let user = store.create_user(User::new("kakao-1", "Alice")).await.unwrap();
        let roadmap = store
            .create_roadmap(Roadmap::new(user.id, "Rust"))
            .await
            .unwrap();
        (store, roadmap)
    }

    fn job(roadmap: &Roadmap) -> SummaryJob {
        SummaryJob {
            roadmap: roadmap.clone(),
            circles: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_run_job_writes_summary_once() {
        let (store, roadmap) = seeded().await;

        let first = run_job(&store, &FixedSummary("first"), job(&roadmap)).await;
        assert_eq!(first, SummaryOutcome::Written);

        let second = run_job(&store, &FixedSummary("second"), job(&roadmap)).await;
        assert_eq!(second, SummaryOutcome::Skipped);

        let stored = store.get_roadmap(roadmap.id).await.unwrap().unwrap();
        assert_eq!(stored.summary.as_deref(), Some("first: Rust (0 steps)"));
    }

    #[tokio::test]
    async fn test_failed_generation_leaves_summary_absent() {
        let (store, roadmap) = seeded().await;

        let outcome = run_job(&store, &FailingSummary, job(&roadmap)).await;
        assert_eq!(outcome, SummaryOutcome::Dropped);

        let stored = store.get_roadmap(roadmap.id).await.unwrap().unwrap();
        assert!(stored.summary.is_none());
    }

    #[tokio::test]
    async fn test_queue_applies_summary_in_background() {
        let (store, roadmap) = seeded().await;
        let store = Arc::new(store);
        let queue = SummaryQueue::spawn(store.clone(), Arc::new(FixedSummary("bg")));
        assert!(queue.is_enabled());

        queue.submit(job(&roadmap));

        let summary = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let current = store.get_roadmap(roadmap.id).await.unwrap().unwrap();
                if let Some(summary) = current.summary {
                    return summary;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        assert_eq!(summary, "bg: Rust (0 steps)");
    }

    #[tokio::test]
    async fn test_disabled_queue_drops_jobs() {
        let (store, roadmap) = seeded().await;
        let queue = SummaryQueue::disabled();
        assert!(!queue.is_enabled());

        queue.submit(job(&roadmap));
        tokio::time::sleep(Duration::from_millis(20)).await;

        let stored = store.get_roadmap(roadmap.id).await.unwrap().unwrap();
        assert!(stored.summary.is_none());
    }
}
