//! Server configuration.

use std::env;

/// Kakao client registration.
#[derive(Debug, Clone)]
pub struct KakaoConfig {
    /// OAuth2 client ID (REST API key).
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// Callback URL registered at Kakao.
    pub redirect_uri: String,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// SQLite database URL. The in-memory store is used when unset.
    pub database_url: Option<String>,
    /// JWT secret.
    pub jwt_secret: String,
    /// JWT expiration in hours.
    pub jwt_expiration_hours: u64,
    /// Frontend URL the login flow redirects to with the token.
    pub frontend_url: String,
    /// Kakao login registration.
    pub kakao: Option<KakaoConfig>,
    /// Gemini API key for roadmap summaries.
    pub gemini_api_key: Option<String>,
    /// Gemini model name.
    pub gemini_model: String,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Creates a configuration with defaults and the given JWT secret.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: None,
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: auth::DEFAULT_JWT_EXPIRATION_HOURS,
            frontend_url: "http://localhost:3000".to_string(),
            kakao: None,
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            log_level: "info".to_string(),
        }
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = env::var("ROADMAP_JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("ROADMAP_JWT_SECRET is required"))?;

        let kakao = match (
            env::var("KAKAO_CLIENT_ID"),
            env::var("KAKAO_CLIENT_SECRET"),
            env::var("KAKAO_REDIRECT_URI"),
        ) {
            (Ok(client_id), Ok(client_secret), Ok(redirect_uri)) => Some(KakaoConfig {
                client_id,
                client_secret,
                redirect_uri,
            }),
            _ => None,
        };

        let defaults = Self::new(jwt_secret);

        Ok(Self {
            host: env::var("ROADMAP_SERVER_HOST").unwrap_or(defaults.host),
            port: env::var("ROADMAP_SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            database_url: env::var("DATABASE_URL").ok(),
            jwt_expiration_hours: env::var("ROADMAP_JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.jwt_expiration_hours),
            frontend_url: env::var("ROADMAP_FRONTEND_URL").unwrap_or(defaults.frontend_url),
            kakao,
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            log_level: env::var("ROADMAP_LOG_LEVEL").unwrap_or(defaults.log_level),
            jwt_secret: defaults.jwt_secret,
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns true if Kakao login is configured.
    pub fn oauth_configured(&self) -> bool {
        self.kakao.is_some()
    }

    /// Returns true if roadmap summaries are enabled.
    pub fn summaries_enabled(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}
