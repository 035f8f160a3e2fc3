//! Authentication API endpoints.

use std::sync::Arc;

use api_protocol::responses::GetCurrentUserResponse;
use auth::{AUTHORIZATION_STATE_MAX_AGE_SECS, AuthError, AuthStateStore, AuthorizationState};
use axum::{
    Extension, Json,
    extract::{Query, State},
    response::Redirect,
};
use roadmap_store::RoadmapStore;
use serde::Deserialize;

use crate::error::{ServerError, ServerResult};
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;

/// Query parameters of the provider callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Sends the browser to the provider's login page.
pub async fn start_login<S: RoadmapStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Redirect> {
    let client = state
        .oauth
        .as_ref()
        .ok_or_else(|| ServerError::InvalidRequest("Kakao login is not configured".to_string()))?;

    let auth_state = AuthorizationState::new();
    state.auth_state_store.store(&auth_state).await?;

    let login_url = client.authorization_url(&auth_state)?;

    tracing::debug!("Redirecting to provider login");

    Ok(Redirect::to(&login_url))
}

/// Handles the provider callback: exchanges the code, resolves the user and
/// redirects to the frontend with an access token.
pub async fn handle_callback<S: RoadmapStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<CallbackQuery>,
) -> ServerResult<Redirect> {
    let client = state
        .oauth
        .as_ref()
        .ok_or_else(|| ServerError::InvalidRequest("Kakao login is not configured".to_string()))?;

    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::info!(error = %error, "Provider rejected the login");
        let message = format!("{} {}", error, description).trim().to_string();
        return Err(AuthError::OAuth(message).into());
    }

    let state_token = query
        .state
        .ok_or_else(|| AuthError::InvalidState("missing state".to_string()))?;
    let code = query
        .code
        .ok_or_else(|| ServerError::InvalidRequest("Missing authorization code".to_string()))?;

    match state.auth_state_store.take(&state_token).await? {
        Some(stored) if !stored.is_expired(AUTHORIZATION_STATE_MAX_AGE_SECS) => {}
        Some(_) => return Err(AuthError::InvalidState("state expired".to_string()).into()),
        None => return Err(AuthError::InvalidState("unknown state".to_string()).into()),
    }

    let tokens = client.exchange_code(&code).await?;
    let principal = client.fetch_principal(&tokens.access_token).await?;

    let redirect_url = state.identity.on_authentication_success(&principal).await?;

    Ok(Redirect::to(&redirect_url))
}

/// Gets the current authenticated user.
pub async fn get_current_user<S: RoadmapStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<GetCurrentUserResponse>> {
    let db_user = state
        .store
        .get_user(user.id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    Ok(Json(GetCurrentUserResponse {
        user: api_protocol::User {
            id: db_user.id.to_string(),
            name: db_user.name,
            created_at: db_user.created_at,
        },
    }))
}
