//! OAuth2 authorization code flow.
//!
//! A small client for providers that do not speak OpenID Connect discovery.
//! Endpoints are configured up front; [`OAuthProviderConfig::kakao`] fills in
//! Kakao's.

use serde::{Deserialize, Serialize};

use crate::{AuthError, AuthResult, OAuth2Principal, SUBJECT_ATTRIBUTE};

const KAKAO_AUTHORIZATION_URI: &str = "https://kauth.kakao.com/oauth/authorize";
const KAKAO_TOKEN_URI: &str = "https://kauth.kakao.com/oauth/token";
const KAKAO_USER_INFO_URI: &str = "https://kapi.kakao.com/v2/user/me";

/// OAuth2 provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthProviderConfig {
    /// Registration name used in login paths (e.g. "kakao")
    pub registration_id: String,

    /// URL of the authorization endpoint
    pub authorization_uri: String,

    /// URL of the token endpoint
    pub token_uri: String,

    /// URL of the user-info endpoint
    pub user_info_uri: String,

    /// OAuth2 client ID
    pub client_id: String,

    /// OAuth2 client secret
    pub client_secret: String,

    /// Redirect URL after authentication
    pub redirect_uri: String,

    /// Scopes to request
    #[serde(default)]
    pub scopes: Vec<String>,

    /// User-info attribute used as the principal's name
    #[serde(default = "default_user_name_attribute")]
    pub user_name_attribute: String,
}

fn default_user_name_attribute() -> String {
    SUBJECT_ATTRIBUTE.to_string()
}

impl OAuthProviderConfig {
    /// Kakao login with the given client registration.
    pub fn kakao(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            registration_id: "kakao".to_string(),
            authorization_uri: KAKAO_AUTHORIZATION_URI.to_string(),
            token_uri: KAKAO_TOKEN_URI.to_string(),
            user_info_uri: KAKAO_USER_INFO_URI.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scopes: vec!["profile_nickname".to_string()],
            user_name_attribute: default_user_name_attribute(),
        }
    }
}

/// Token response from the provider
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The access token
    pub access_token: String,

    /// Token type (usually "bearer")
    pub token_type: String,

    /// When the token expires (in seconds)
    #[serde(default)]
    pub expires_in: Option<u64>,

    /// The refresh token (if granted)
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Scopes granted
    #[serde(default)]
    pub scope: Option<String>,
}

/// Authorization state for CSRF protection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationState {
    /// CSRF token
    pub state: String,

    /// Timestamp when this state was created
    pub created_at: i64,
}

impl AuthorizationState {
    /// Create new authorization state
    pub fn new() -> Self {
        Self {
            state: generate_random_string(32),
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Check if this state has expired
    pub fn is_expired(&self, max_age_secs: i64) -> bool {
        let now = chrono::Utc::now().timestamp();
        now - self.created_at > max_age_secs
    }
}

impl Default for AuthorizationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a random string for the state parameter
fn generate_random_string(len: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Appends `token` as a query parameter to `base_url`.
///
/// Existing query parameters on the base URL are kept.
pub fn build_token_redirect_url(base_url: &str, token: &str) -> AuthResult<String> {
    let mut url = url::Url::parse(base_url)
        .map_err(|e| AuthError::Configuration(format!("Invalid redirect base URL: {}", e)))?;
    url.query_pairs_mut().append_pair("token", token);
    Ok(url.to_string())
}

/// OAuth2 authorization code client
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthProviderConfig,
    http: reqwest::Client,
}

impl OAuthClient {
    /// Create a new OAuth2 client
    pub fn new(config: OAuthProviderConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Build the authorization URL the browser is sent to
    pub fn authorization_url(&self, state: &AuthorizationState) -> AuthResult<String> {
        let mut url = url::Url::parse(&self.config.authorization_uri)
            .map_err(|e| AuthError::OAuth(format!("Invalid authorization endpoint: {}", e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("response_type", "code");
            query.append_pair("client_id", &self.config.client_id);
            query.append_pair("redirect_uri", &self.config.redirect_uri);
            if !self.config.scopes.is_empty() {
                query.append_pair("scope", &self.config.scopes.join(" "));
            }
            query.append_pair("state", &state.state);
        }

        Ok(url.to_string())
    }

    /// Build token request parameters
    pub fn token_request_params(&self, code: &str) -> Vec<(String, String)> {
        vec![
            ("grant_type".to_string(), "authorization_code".to_string()),
            ("code".to_string(), code.to_string()),
            ("redirect_uri".to_string(), self.config.redirect_uri.clone()),
            ("client_id".to_string(), self.config.client_id.clone()),
            (
                "client_secret".to_string(),
                self.config.client_secret.clone(),
            ),
        ]
    }

    /// Exchange an authorization code for provider tokens
    pub async fn exchange_code(&self, code: &str) -> AuthResult<TokenResponse> {
        tracing::debug!(
            provider = %self.config.registration_id,
            "Exchanging authorization code"
        );

        let response = self
            .http
            .post(&self.config.token_uri)
            .form(&self.token_request_params(code))
            .send()
            .await?;

        if !response.status().is_success() {
            // The body may echo credentials, so only the status is reported.
            return Err(AuthError::OAuth(format!(
                "Token endpoint returned {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    /// Fetch the user-info payload with a provider access token
    pub async fn fetch_principal(&self, access_token: &str) -> AuthResult<OAuth2Principal> {
        let response = self
            .http
            .get(&self.config.user_info_uri)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::OAuth(format!(
                "User-info endpoint returned {}",
                response.status()
            )));
        }

        let payload: serde_json::Value = response.json().await?;
        Ok(OAuth2Principal::from_json(
            payload,
            &self.config.user_name_attribute,
        ))
    }
}
