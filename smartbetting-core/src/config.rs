//! Configuration system for smartbetting.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment.
//! Configuration is loaded from `~/.config/smartbetting/config.toml` and/or
//! `.smartbetting/config.toml` in the working directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for a snapshot run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmartbettingConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

impl SmartbettingConfig {
    /// Collect warnings from every section.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = self.api.validate();
        warnings.extend(self.storage.validate());
        warnings
    }
}

/// balldontlie API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the v1 API, without a trailing slash.
    pub base_url: String,
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Inline API key. Takes precedence over `api_key_env` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.balldontlie.io/v1".to_string(),
            api_key_env: "BALLDONTLIE_API_KEY".to_string(),
            api_key: None,
        }
    }
}

impl ApiConfig {
    /// Validate this API config and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.api_key_env.trim().is_empty() && self.api_key.is_none() {
            warnings.push("api.api_key_env is empty and no inline api_key is set".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            warnings.push(format!(
                "api.base_url ({}) is not an http(s) URL",
                self.base_url
            ));
        }
        if self.base_url.ends_with('/') {
            warnings.push(format!(
                "api.base_url ({}) has a trailing slash; request paths will contain '//'",
                self.base_url
            ));
        }
        warnings
    }
}

/// Object storage settings.
///
/// Credentials are never configured here; they are resolved from the ambient
/// AWS environment (`AWS_ACCESS_KEY_ID`, `AWS_PROFILE`, instance metadata, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Region override. Falls back to `AWS_REGION` / `AWS_DEFAULT_REGION`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible stores (MinIO, LocalStack, R2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Permit plain-http endpoints.
    #[serde(default)]
    pub allow_http: bool,
}

impl StorageConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(endpoint) = &self.endpoint
            && endpoint.starts_with("http://")
            && !self.allow_http
        {
            warnings.push(format!(
                "storage.endpoint ({}) is plain http but storage.allow_http is false",
                endpoint
            ));
        }
        warnings
    }
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with `SMARTBETTING_`)
/// 2. Workspace-local config (`.smartbetting/config.toml`)
/// 3. User config (`~/.config/smartbetting/config.toml`)
/// 4. Built-in defaults
pub fn load_config(workspace: Option<&Path>) -> Result<SmartbettingConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(SmartbettingConfig::default()));

    // User-level config
    if let Some(config_dir) = directories::ProjectDirs::from("dev", "smartbetting", "smartbetting")
    {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = ws.join(".smartbetting").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // Environment variables (SMARTBETTING_API__BASE_URL, SMARTBETTING_STORAGE__REGION, etc.)
    figment = figment.merge(Env::prefixed("SMARTBETTING_").split("__"));

    figment.extract().map_err(Box::new)
}
