//! One-shot snapshot loader
//!
//! Posts a fixed JSON payload to a query endpoint and returns the records
//! under the response's `data` field. This is the data feed behind the
//! dashboard; rendering is left to whoever consumes the records.

use crate::auth::AuthConfig;
use crate::decode::{JsonDecoder, RecordDecoder};
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClient, HttpClientConfig};
use crate::types::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "apikey";

/// Response field holding the records
pub const DATA_FIELD: &str = "data";

/// Endpoint, key and payload of a snapshot query
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Query endpoint URL
    #[serde(rename = "API_URL")]
    pub api_url: String,

    /// API key sent in the `apikey` header
    #[serde(rename = "API_KEY")]
    pub api_key: String,

    /// JSON body posted as-is
    #[serde(rename = "PAYLOAD", default)]
    pub payload: Value,
}

impl SnapshotConfig {
    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read endpoint config {}", path.display()))?;
        Self::from_json_str(&content)
    }

    /// Parse from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| Error::config(format!("Invalid endpoint config: {e}")))?;

        if config.api_url.trim().is_empty() {
            return Err(Error::missing_field("API_URL"));
        }
        Ok(config)
    }

    /// Build a client that sends the API key with every request
    pub fn client(&self, http: HttpClientConfig) -> Result<HttpClient> {
        HttpClient::with_auth(http, AuthConfig::api_key(API_KEY_HEADER, &self.api_key))
    }
}

impl std::fmt::Debug for SnapshotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("payload", &self.payload)
            .finish()
    }
}

/// Post the payload once and return the records under `data`
///
/// A non-2xx status is `Error::HttpStatus`; a response without `data`
/// is `Error::RecordExtraction`.
pub async fn fetch_snapshot(client: &HttpClient, config: &SnapshotConfig) -> Result<Vec<Record>> {
    info!(url = %config.api_url, "Loading snapshot");

    let response = client.post(&config.api_url, config.payload.clone()).await?;
    let body = response.text().await?;
    let records = JsonDecoder::with_path(DATA_FIELD).decode(&body)?.into_records();

    info!(records = records.len(), "Snapshot loaded");
    Ok(records)
}
