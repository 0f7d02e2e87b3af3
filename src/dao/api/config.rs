use super::error::{ApiResult, TransportError};

/// Environment variable holding the server base URL.
pub const BASE_URL_ENV: &str = "PARTY_GAMES_URL";

/// Runtime configuration describing how to reach the party-games server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub user_agent: Option<String>,
}

impl ApiConfig {
    /// Construct a configuration from an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: None,
        }
    }

    /// Attach a custom user agent to every request.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> ApiResult<Self> {
        let base_url = std::env::var(BASE_URL_ENV)
            .map_err(|_| TransportError::MissingEnvVar { var: BASE_URL_ENV })?;
        Ok(Self::new(base_url))
    }
}
