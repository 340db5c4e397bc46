//! Source configuration
//!
//! `SourceConfig` is the on-disk (YAML or JSON) description of how to talk
//! to the provider. Every field has a default, so an empty file is valid.
//! Secrets never live here: the config only names the environment
//! variables the host reads them from.

use crate::auth::{AuthScheme, Credentials, DEFAULT_IDENTITY_VAR, DEFAULT_TOKEN_VAR};
use crate::engine::FetchConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::RateLimiterConfig;
use crate::pagination::{StopCondition, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Public GitHub REST API
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

// ============================================================================
// Source Config
// ============================================================================

/// Provider connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Base URL for API requests
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// How the token goes into the Authorization header
    #[serde(default)]
    pub auth_scheme: AuthScheme,

    /// Environment variable holding the identity label
    #[serde(default = "default_identity_env")]
    pub identity_env: String,

    /// Environment variable holding the token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// When to stop paginating
    #[serde(default)]
    pub stop_condition: StopCondition,

    /// Per-request timeout; none by default
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Client-side throttling; off by default
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_identity_env() -> String {
    DEFAULT_IDENTITY_VAR.to_string()
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_VAR.to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            auth_scheme: AuthScheme::default(),
            identity_env: default_identity_env(),
            token_env: default_token_env(),
            stop_condition: StopCondition::default(),
            timeout_seconds: None,
            rate_limit: None,
            headers: HashMap::new(),
        }
    }
}

impl SourceConfig {
    /// Load from a file; `.yaml`/`.yml` parse as YAML, anything else as JSON
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );

        if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Parse from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;

        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be greater than 0"));
        }
        if self.token_env.trim().is_empty() {
            return Err(Error::invalid_value("token_env", "must not be empty"));
        }
        if self.timeout_seconds == Some(0) {
            return Err(Error::invalid_value(
                "timeout_seconds",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Resolve credentials from the process environment
    pub fn credentials_from_env(&self) -> Result<Credentials> {
        Credentials::from_env(&self.identity_env, &self.token_env)
    }

    /// Build the fetcher configuration around already-resolved credentials
    pub fn fetch_config(&self, credentials: Option<Credentials>) -> FetchConfig {
        FetchConfig {
            base_url: self.base_url.clone(),
            page_size: self.page_size,
            auth_scheme: self.auth_scheme,
            credentials,
            stop_condition: self.stop_condition,
            timeout: self.timeout_seconds.map(Duration::from_secs),
            rate_limit: self.rate_limit.clone(),
            headers: self.headers.clone(),
        }
    }
}
