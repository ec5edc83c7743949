//! Configuration Management
//!
//! [`ClientConfig`] is what the transport is built from. [`Config`] is the
//! persisted user configuration the command line layers flags on top of.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const ENDPOINT_ENV: &str = "VOLCTL_ENDPOINT";
pub const AUTH_TOKEN_ENV: &str = "VOLCTL_AUTH_TOKEN";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Transport settings, fixed for the lifetime of an [`crate::ApiClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Versioned service root, e.g. `http://cinder:8776/v1/<tenant>`
    pub endpoint: String,
    pub auth_token: Option<String>,
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth_token: None,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            user_agent: format!("volctl/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Request timeout in seconds, 0 disables it
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("volctl").join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Overlay environment variables on top of the file values
    pub fn with_env(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            self.endpoint = Some(endpoint);
        }
        if let Ok(token) = std::env::var(AUTH_TOKEN_ENV) {
            self.auth_token = Some(token);
        }
        self
    }

    /// Resolve into transport settings (CLI > env > file)
    pub fn resolve(&self, endpoint: Option<&str>, auth_token: Option<&str>) -> Result<ClientConfig> {
        let endpoint = endpoint
            .map(str::to_string)
            .or_else(|| self.endpoint.clone())
            .with_context(|| {
                format!("No endpoint configured. Set {ENDPOINT_ENV} or use --endpoint")
            })?;

        let mut config = ClientConfig::new(endpoint);
        if let Some(token) = auth_token.map(str::to_string).or_else(|| self.auth_token.clone()) {
            config = config.with_auth_token(token);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout((secs > 0).then(|| Duration::from_secs(secs)));
        }

        Ok(config)
    }
}
