//! Authenticator implementation
//!
//! Applies the configured authentication to outgoing requests.

use super::types::{AuthConfig, AuthScheme};
use crate::error::{Error, Result};
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::RequestBuilder;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Create an authenticator, rejecting token auth without a usable token
    pub fn validated(config: AuthConfig) -> Result<Self> {
        match &config {
            AuthConfig::Token { credentials, .. } => credentials.validate()?,
            AuthConfig::ApiKey { header_name, value } => {
                if header_name.trim().is_empty() {
                    return Err(Error::invalid_value("header_name", "must not be empty"));
                }
                if value.trim().is_empty() {
                    return Err(Error::missing_credential(header_name.clone()));
                }
            }
            AuthConfig::None => {}
        }
        Ok(Self::new(config))
    }

    /// Get the auth configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config {
            AuthConfig::None => req,

            AuthConfig::Token {
                scheme,
                credentials,
            } => {
                let req = req.header(USER_AGENT, credentials.user_agent());
                match scheme {
                    AuthScheme::Bearer => req.bearer_auth(&credentials.token),
                    AuthScheme::Token => {
                        req.header(AUTHORIZATION, format!("token {}", credentials.token))
                    }
                    AuthScheme::Basic => req.basic_auth(
                        credentials.identity.as_deref().unwrap_or_default(),
                        Some(&credentials.token),
                    ),
                }
            }

            AuthConfig::ApiKey { header_name, value } => req.header(header_name.as_str(), value),
        }
    }
}
