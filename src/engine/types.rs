//! Engine types
//!
//! Fetcher configuration and connection check results.

use crate::auth::{AuthScheme, Credentials};
use crate::config::DEFAULT_BASE_URL;
use crate::http::RateLimiterConfig;
use crate::pagination::{StopCondition, DEFAULT_PAGE_SIZE};
use crate::types::Record;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Everything the fetcher needs, resolved up front by the caller
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base URL for API requests
    pub base_url: String,
    /// Records requested per page
    pub page_size: u32,
    /// Authorization header scheme
    pub auth_scheme: AuthScheme,
    /// Identity and token; required
    pub credentials: Option<Credentials>,
    /// When to stop paginating
    pub stop_condition: StopCondition,
    /// Per-request timeout
    pub timeout: Option<Duration>,
    /// Client-side throttling
    pub rate_limit: Option<RateLimiterConfig>,
    /// Extra headers for every request
    pub headers: HashMap<String, String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            auth_scheme: AuthScheme::default(),
            credentials: None,
            stop_condition: StopCondition::default(),
            timeout: None,
            rate_limit: None,
            headers: HashMap::new(),
        }
    }
}

impl FetchConfig {
    /// Default configuration around the given credentials
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: Some(credentials),
            ..Self::default()
        }
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the Authorization scheme
    #[must_use]
    pub fn with_auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = scheme;
        self
    }

    /// Set the stop condition
    #[must_use]
    pub fn with_stop_condition(mut self, condition: StopCondition) -> Self {
        self.stop_condition = condition;
        self
    }
}

/// Result of a connection check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,
    /// HTTP status of the check request
    pub status: u16,
    /// Error text if failed
    pub message: Option<String>,
    /// First record of the first page, if any
    pub sample: Option<Record>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success(status: u16, sample: Option<Record>) -> Self {
        Self {
            success: true,
            status,
            message: None,
            sample,
        }
    }

    /// Create a failed check result
    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status,
            message: Some(message.into()),
            sample: None,
        }
    }
}
