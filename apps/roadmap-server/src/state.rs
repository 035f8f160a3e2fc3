//! Application state.

use std::sync::Arc;

use auth::{JwtManager, MemoryAuthStateStore, OAuthClient};
use roadmap_store::RoadmapStore;

use crate::config::Config;
use crate::services::{IdentityBridge, RoadmapService};

/// Shared application state.
pub struct AppState<S: RoadmapStore> {
    /// Server configuration.
    pub config: Config,
    /// Roadmap store.
    pub store: Arc<S>,
    /// JWT manager used to validate bearer tokens.
    pub jwt_manager: JwtManager,
    /// Kakao login client, when configured.
    pub oauth: Option<OAuthClient>,
    /// Pending login states.
    pub auth_state_store: MemoryAuthStateStore,
    /// Roadmap queries and commands.
    pub roadmaps: RoadmapService<S>,
    /// Login to local user bridge.
    pub identity: IdentityBridge<S>,
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;
