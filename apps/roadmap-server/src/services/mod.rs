//! Application services.

pub mod gemini;
pub mod identity;
pub mod roadmap;
pub mod summary;

pub use gemini::GeminiSummarizer;
pub use identity::IdentityBridge;
pub use roadmap::RoadmapService;
pub use summary::{SummaryError, SummaryGenerator, SummaryJob, SummaryQueue};
