//! Bridges a successful OAuth2 login to a local user and access token.

use std::sync::Arc;

use auth::{JwtManager, OAuth2Principal, build_token_redirect_url};
use entities::User;
use roadmap_store::{RoadmapStore, RoadmapStoreError};

use crate::error::{ServerError, ServerResult};

/// Turns provider principals into local users and token redirects.
pub struct IdentityBridge<S: RoadmapStore> {
    store: Arc<S>,
    jwt: JwtManager,
    frontend_url: String,
}

impl<S: RoadmapStore> IdentityBridge<S> {
    pub fn new(store: Arc<S>, jwt: JwtManager, frontend_url: impl Into<String>) -> Self {
        Self {
            store,
            jwt,
            frontend_url: frontend_url.into(),
        }
    }

    /// Finds the user for `principal`, provisioning one on first login.
    pub async fn resolve_user(&self, principal: &OAuth2Principal) -> ServerResult<User> {
        let social_id = principal.external_id().inspect_err(|e| {
            tracing::error!(error = %e, "Provider returned a principal without an id");
        })?;

        if let Some(user) = self.store.get_user_by_social_id(&social_id).await? {
            return Ok(user);
        }

        let name = principal
            .display_name()
            .unwrap_or_else(|| social_id.clone());

        match self.store.create_user(User::new(&social_id, name)).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "User provisioned");
                Ok(user)
            }
            // A concurrent first login for the same account got there first.
            Err(RoadmapStoreError::AlreadyExists { .. }) => self
                .store
                .get_user_by_social_id(&social_id)
                .await?
                .ok_or_else(|| {
                    ServerError::Internal(format!(
                        "User {} vanished after a duplicate insert",
                        social_id
                    ))
                }),
            Err(e) => Err(e.into()),
        }
    }

    /// Handles a successful provider login and returns the frontend redirect
    /// URL carrying a freshly issued access token.
    pub async fn on_authentication_success(
        &self,
        principal: &OAuth2Principal,
    ) -> ServerResult<String> {
        let user = self.resolve_user(principal).await?;
        let token = self.jwt.issue_access_token(user.id)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(build_token_redirect_url(&self.frontend_url, &token)?)
    }

    /// Returns the JWT manager used to issue tokens.
    pub fn jwt(&self) -> &JwtManager {
        &self.jwt
    }
}
