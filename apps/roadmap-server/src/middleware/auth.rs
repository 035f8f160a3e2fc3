//! Authentication middleware.

use std::sync::Arc;

use auth::{AuthError, Claims};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use roadmap_store::RoadmapStore;
use uuid::Uuid;

use crate::error::ServerError;
use crate::state::AppState;

/// Authenticated user information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// User ID.
    pub id: Uuid,
}

impl TryFrom<Claims> for AuthenticatedUser {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: claims.user_id()?,
        })
    }
}

/// Extracts the bearer token from the Authorization header.
fn extract_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Authentication middleware.
///
/// Validates the bearer token and stores the authenticated user in the
/// request extensions. Requests without a valid token are rejected.
pub async fn auth_middleware<S: RoadmapStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_token(&request) else {
        return ServerError::AuthenticationRequired.into_response();
    };

    let user = match state
        .jwt_manager
        .validate_token(token)
        .and_then(AuthenticatedUser::try_from)
    {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            return ServerError::Auth(e).into_response();
        }
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Optional authentication middleware.
///
/// Works like [`auth_middleware`] but lets the request through anonymously
/// when the token is missing or invalid.
pub async fn optional_auth_middleware<S: RoadmapStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(&request) {
        if let Ok(user) = state
            .jwt_manager
            .validate_token(token)
            .and_then(AuthenticatedUser::try_from)
        {
            request.extensions_mut().insert(user);
        }
    }

    next.run(request).await
}
