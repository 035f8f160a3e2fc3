//! Server error types.

use api_protocol::{ErrorResponse, error_codes};
use auth::AuthError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roadmap_store::RoadmapStoreError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authentication required.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Database error.
    #[error("Database error: {0}")]
    Database(RoadmapStoreError),

    /// Authentication error.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RoadmapStoreError> for ServerError {
    fn from(e: RoadmapStoreError) -> Self {
        if e.is_not_found() {
            ServerError::NotFound(e.to_string())
        } else {
            ServerError::Database(e)
        }
    }
}

impl ServerError {
    /// Returns the status code and API error code for this error.
    fn status_and_code(&self) -> (StatusCode, i32) {
        match self {
            ServerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, error_codes::INVALID_REQUEST),
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, error_codes::RESOURCE_NOT_FOUND),
            ServerError::AuthenticationRequired => {
                (StatusCode::UNAUTHORIZED, error_codes::AUTHENTICATION_REQUIRED)
            }
            ServerError::Database(_) | ServerError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
            }
            ServerError::Auth(AuthError::MalformedIdentity { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::MALFORMED_IDENTITY)
            }
            ServerError::Auth(
                AuthError::Configuration(_) | AuthError::JwtEncoding(_) | AuthError::Other(_),
            ) => (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR),
            ServerError::Auth(AuthError::Http(_)) => {
                (StatusCode::BAD_GATEWAY, error_codes::INTERNAL_ERROR)
            }
            ServerError::Auth(_) => (StatusCode::UNAUTHORIZED, error_codes::AUTHENTICATION_REQUIRED),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let message = match &self {
            ServerError::InvalidRequest(msg)
            | ServerError::NotFound(msg)
            | ServerError::Internal(msg) => msg.clone(),
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(error_code, message))).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
