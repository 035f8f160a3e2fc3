//! Authorization state storage
//!
//! Keeps the CSRF `state` values handed out at login until the provider
//! redirects back.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{AuthResult, AuthorizationState};

/// Trait for authorization state storage
#[async_trait]
pub trait AuthStateStore: Send + Sync {
    /// Store an authorization state
    async fn store(&self, state: &AuthorizationState) -> AuthResult<()>;

    /// Retrieve and remove an authorization state by state token
    ///
    /// The state is removed upon retrieval so it cannot be replayed.
    async fn take(&self, state_token: &str) -> AuthResult<Option<AuthorizationState>>;

    /// Remove expired states
    ///
    /// Returns the number of states removed.
    async fn cleanup_expired(&self, max_age_secs: i64) -> AuthResult<usize>;
}

/// In-memory authorization state store
#[derive(Debug, Default)]
pub struct MemoryAuthStateStore {
    states: RwLock<HashMap<String, AuthorizationState>>,
}

impl MemoryAuthStateStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthStateStore for MemoryAuthStateStore {
    async fn store(&self, state: &AuthorizationState) -> AuthResult<()> {
        let mut states = self.states.write().await;
        states.insert(state.state.clone(), state.clone());
        Ok(())
    }

    async fn take(&self, state_token: &str) -> AuthResult<Option<AuthorizationState>> {
        let mut states = self.states.write().await;
        Ok(states.remove(state_token))
    }

    async fn cleanup_expired(&self, max_age_secs: i64) -> AuthResult<usize> {
        let mut states = self.states.write().await;
        let before_count = states.len();
        states.retain(|_, state| !state.is_expired(max_age_secs));
        Ok(before_count - states.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_take_is_single_use() {
        let store = MemoryAuthStateStore::new();
        let state = AuthorizationState::new();
        let state_token = state.state.clone();

        store.store(&state).await.unwrap();

        let retrieved = store.take(&state_token).await.unwrap();
        assert_eq!(retrieved.map(|s| s.state), Some(state_token.clone()));

        assert!(store.take(&state_token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_cleanup() {
        let store = MemoryAuthStateStore::new();

        let mut old_state = AuthorizationState::new();
        old_state.created_at = chrono::Utc::now().timestamp() - 1000;
        let fresh_state = AuthorizationState::new();

        store.store(&old_state).await.unwrap();
        store.store(&fresh_state).await.unwrap();

        let removed = store.cleanup_expired(600).await.unwrap();
        assert_eq!(removed, 1);

        assert!(store.take(&old_state.state).await.unwrap().is_none());
        assert!(store.take(&fresh_state.state).await.unwrap().is_some());
    }
}
