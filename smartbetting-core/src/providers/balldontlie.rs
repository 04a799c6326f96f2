//! balldontlie API provider.
//!
//! Talks to the v1 REST API (`https://api.balldontlie.io/v1`). Authentication
//! is a bare API key in the `Authorization` header.

use crate::config::ApiConfig;
use crate::error::{ApiError, ConfigError};
use crate::source::TeamsSource;
use crate::types::{ListResponse, Team};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// HTTP client for the balldontlie API.
pub struct BalldontlieProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for BalldontlieProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalldontlieProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl BalldontlieProvider {
    /// Create a new provider from configuration.
    ///
    /// Reads the API key from the environment variable named in
    /// `config.api_key_env` unless `config.api_key` is set. A missing key is
    /// a configuration error; no request is made.
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(&config.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::EnvVarMissing {
                var: config.api_key_env.clone(),
            })?;
        Ok(Self::new_with_key(config, api_key))
    }

    /// Create a new provider with an explicitly provided API key.
    pub fn new_with_key(config: &ApiConfig, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Map a non-success response to the matching [`ApiError`] category.
    fn map_http_error(status: reqwest::StatusCode, body: &str) -> ApiError {
        debug!(status = status.as_u16(), body = %body, "balldontlie request failed");
        let details = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("no response body")
                .to_string()
        } else {
            body.trim().to_string()
        };
        ApiError::from_status(status.as_u16(), details)
    }
}

#[async_trait]
impl TeamsSource for BalldontlieProvider {
    async fn list_teams(&self) -> Result<Vec<Team>, ApiError> {
        let url = format!("{}/teams", self.base_url);
        debug!(url = %url, "Requesting team list");

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| ApiError::Unexpected {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Unexpected {
            message: format!("Failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            return Err(Self::map_http_error(status, &body));
        }

        let parsed: ListResponse<Team> =
            serde_json::from_str(&body).map_err(|e| ApiError::Unexpected {
                message: format!("Failed to parse teams response: {}", e),
            })?;
        Ok(parsed.data)
    }

    fn name(&self) -> &str {
        "balldontlie"
    }
}
