//! Auth configuration types
//!
//! Credentials are resolved once by the host (normally from the process
//! environment) and handed to the fetcher; nothing in here reads the
//! environment on its own except `Credentials::from_env`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User agent sent when no identity label is configured
pub const DEFAULT_USER_AGENT: &str = "gitsync-source";

/// Default environment variable holding the identity label
pub const DEFAULT_IDENTITY_VAR: &str = "GITSYNC_USERNAME";

/// Default environment variable holding the token
pub const DEFAULT_TOKEN_VAR: &str = "GITSYNC_PASSWORD";

/// How the token is placed in the `Authorization` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>`
    #[default]
    Bearer,
    /// `Authorization: token <token>` (older GitHub form)
    Token,
    /// HTTP Basic with identity as username and token as password
    Basic,
}

/// Identity label plus secret token
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Identity label, also used as the User-Agent
    pub identity: Option<String>,
    /// Secret token
    pub token: String,
}

impl Credentials {
    /// Create credentials from explicit values
    pub fn new(identity: Option<String>, token: impl Into<String>) -> Self {
        Self {
            identity: identity.filter(|s| !s.trim().is_empty()),
            token: token.into(),
        }
    }

    /// Resolve credentials from the process environment
    pub fn from_env(identity_var: &str, token_var: &str) -> Result<Self> {
        Self::from_lookup(identity_var, token_var, |name| std::env::var(name).ok())
    }

    /// Resolve credentials through an arbitrary variable lookup
    ///
    /// Fails with `MissingCredential` when the token variable is unset or blank.
    pub fn from_lookup<F>(identity_var: &str, token_var: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(token_var)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::missing_credential(token_var))?;

        Ok(Self::new(lookup(identity_var), token))
    }

    /// Value for the User-Agent header
    pub fn user_agent(&self) -> &str {
        self.identity.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Check the token is usable
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::missing_credential("token"));
        }
        Ok(())
    }
}

// Keep the token out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Token in the Authorization header, identity in the User-Agent
    Token {
        /// Header scheme
        scheme: AuthScheme,
        /// Identity and token
        credentials: Credentials,
    },

    /// API key in a custom header
    ApiKey {
        /// Header name, e.g. `apikey`
        header_name: String,
        /// The API key value
        value: String,
    },
}

impl AuthConfig {
    /// Token auth with the given scheme
    pub fn token(scheme: AuthScheme, credentials: Credentials) -> Self {
        Self::Token {
            scheme,
            credentials,
        }
    }

    /// API key auth in a named header
    pub fn api_key(header_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ApiKey {
            header_name: header_name.into(),
            value: value.into(),
        }
    }
}
