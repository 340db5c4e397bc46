//! Common types used throughout gitsync-source
//!
//! Shared type aliases plus the request target that names what to fetch.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// One opaque item returned by the provider, passed through unmodified
pub type Record = JsonValue;

/// Ordered query parameters
pub type QueryParams = Vec<(String, String)>;

// ============================================================================
// Request Target
// ============================================================================

/// Which collection and sub-resource to fetch
///
/// `collection` is an "owner/name" identifier and `subresource` a resource
/// name such as `commits` or `issues`. Only non-emptiness is checked here;
/// malformed identifiers are left for the provider to reject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTarget {
    /// Collection identifier, e.g. `octocat/hello-world`
    pub collection: String,
    /// Sub-resource name, e.g. `commits`
    pub subresource: String,
}

impl RequestTarget {
    /// Create a target, rejecting empty identifiers
    pub fn new(
        collection: impl Into<String>,
        subresource: impl Into<String>,
    ) -> crate::Result<Self> {
        let collection = collection.into();
        let subresource = subresource.into();

        if collection.trim().is_empty() {
            return Err(crate::Error::invalid_value("collection", "must not be empty"));
        }
        if subresource.trim().is_empty() {
            return Err(crate::Error::invalid_value("subresource", "must not be empty"));
        }

        Ok(Self {
            collection,
            subresource,
        })
    }

    /// Path of the collection endpoint, relative to the API base URL
    pub fn path(&self) -> String {
        format!(
            "repos/{}/{}",
            self.collection.trim_matches('/'),
            self.subresource.trim_matches('/')
        )
    }
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.subresource)
    }
}

// ============================================================================
// Log Level
// ============================================================================

/// Log level for CLI log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}
