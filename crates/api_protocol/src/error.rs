//! API error codes and the error body.

use serde::{Deserialize, Serialize};

/// Error codes carried in error responses.
pub mod error_codes {
    /// The request body or parameters are invalid.
    pub const INVALID_REQUEST: i32 = -32600;
    /// Internal server error.
    pub const INTERNAL_ERROR: i32 = -32603;
    /// Authentication required or token rejected.
    pub const AUTHENTICATION_REQUIRED: i32 = -32001;
    /// The requested resource was not found.
    pub const RESOURCE_NOT_FOUND: i32 = -32003;
    /// The identity provider returned an unusable principal.
    pub const MALFORMED_IDENTITY: i32 = -32010;
}

/// Error object inside an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

impl ErrorResponse {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            error: ApiError {
                code,
                message: message.into(),
            },
        }
    }
}
