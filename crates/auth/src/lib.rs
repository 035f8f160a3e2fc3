//! Access tokens and OAuth2 login for the roadmap server.
//!
//! This crate provides:
//! - JWT access token issuing and validation
//! - An OAuth2 authorization code client (Kakao by default)
//! - The authenticated principal returned by the provider
//! - Authorization state storage for CSRF protection

mod error;
mod jwt;
mod oauth;
mod principal;
mod state_store;

pub use error::*;
pub use jwt::*;
pub use oauth::*;
pub use principal::*;
pub use state_store::*;

/// Default JWT expiration time in hours.
pub const DEFAULT_JWT_EXPIRATION_HOURS: u64 = 24;

/// Default JWT issuer.
pub const DEFAULT_JWT_ISSUER: &str = "roadmap-server";

/// How long a login `state` value stays valid, in seconds.
pub const AUTHORIZATION_STATE_MAX_AGE_SECS: i64 = 600;
