//! HTTP client module
//!
//! Thin wrapper over reqwest used by the fetcher and the snapshot loader.
//!
//! # Features
//!
//! - **Single attempt**: non-2xx responses fail with status and body, no retry
//! - **Rate Limiting**: optional token bucket limiter using governor
//! - **Authentication**: integration with the auth module

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
