//! Roadmap Server
//!
//! Serves user-authored learning roadmaps: listing, search, detail views with
//! view counting, likes, and Kakao login. Roadmap summaries are generated in
//! the background after creation.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

use std::sync::Arc;

use auth::{JwtConfig, JwtManager, MemoryAuthStateStore, OAuthClient, OAuthProviderConfig};
use axum::Router;
use roadmap_store::RoadmapStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::services::{
    GeminiSummarizer, IdentityBridge, RoadmapService, SummaryGenerator, SummaryQueue,
};
use crate::state::{AppState, SharedState};

/// Creates the application router with all routes configured.
pub fn create_app<S: RoadmapStore + 'static>(state: SharedState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::create_router(state.clone())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Creates the application state with the given configuration and store.
///
/// Starts the summary worker when a Gemini API key is configured, so this
/// must be called from within a tokio runtime.
pub fn create_state<S: RoadmapStore + 'static>(config: Config, store: S) -> SharedState<S> {
    let generator = config.gemini_api_key.as_ref().map(|api_key| {
        Arc::new(GeminiSummarizer::new(api_key, &config.gemini_model)) as Arc<dyn SummaryGenerator>
    });
    create_state_with_generator(config, store, generator)
}

/// Creates the application state with an explicit summary generator.
///
/// Passing `None` disables roadmap summaries.
pub fn create_state_with_generator<S: RoadmapStore + 'static>(
    config: Config,
    store: S,
    generator: Option<Arc<dyn SummaryGenerator>>,
) -> SharedState<S> {
    let store = Arc::new(store);

    let jwt_config =
        JwtConfig::new(&config.jwt_secret).with_expiration_hours(config.jwt_expiration_hours);
    let jwt_manager = JwtManager::new(jwt_config);

    let summaries = match generator {
        Some(generator) => SummaryQueue::spawn(store.clone(), generator),
        None => {
            tracing::info!("GEMINI_API_KEY not set, roadmap summaries disabled");
            SummaryQueue::disabled()
        }
    };

    let oauth = config.kakao.as_ref().map(|kakao| {
        OAuthClient::new(OAuthProviderConfig::kakao(
            &kakao.client_id,
            &kakao.client_secret,
            &kakao.redirect_uri,
        ))
    });

    Arc::new(AppState {
        roadmaps: RoadmapService::new(store.clone(), summaries),
        identity: IdentityBridge::new(
            store.clone(),
            jwt_manager.clone(),
            config.frontend_url.clone(),
        ),
        store,
        jwt_manager,
        oauth,
        auth_state_store: MemoryAuthStateStore::new(),
        config,
    })
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=debug", log_level)));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
