//! Provider configuration
//!
//! The API token and endpoint are layered: an explicit value wins over the
//! `RAILWAY_TOKEN` environment variable, which wins over the config file at
//! `<config dir>/terraform-provider-railway/config.json`.

use crate::error::{ProviderError, ProviderResult};
use crate::railway::client::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

pub const TOKEN_ENV_VAR: &str = "RAILWAY_TOKEN";

/// Provider block configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Railway API token
    #[serde(default)]
    pub token: Option<String>,
    /// GraphQL endpoint, mainly for testing against a mock server
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Fully resolved connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub token: String,
    pub endpoint: Url,
}

impl std::fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ProviderConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("terraform-provider-railway").join("config.json"))
    }

    /// Load configuration from disk. A missing or unreadable file yields the defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config file {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Resolve against the environment and the config file
    pub fn resolve(self) -> ProviderResult<ResolvedConfig> {
        let env_token = std::env::var(TOKEN_ENV_VAR).ok();
        self.layered(env_token, Self::load())
    }

    /// Resolve with explicit values first, then `env_token`, then `file`
    pub fn layered(self, env_token: Option<String>, file: ProviderConfig) -> ProviderResult<ResolvedConfig> {
        let token = non_empty(self.token)
            .or_else(|| non_empty(env_token))
            .or_else(|| non_empty(file.token))
            .ok_or(ProviderError::MissingToken)?;

        let endpoint = non_empty(self.endpoint)
            .or_else(|| non_empty(file.endpoint))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let endpoint = Url::parse(&endpoint).map_err(|_| ProviderError::InvalidEndpoint(endpoint.clone()))?;

        Ok(ResolvedConfig { token, endpoint })
    }
}
