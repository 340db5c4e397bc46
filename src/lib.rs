// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # gitsync-source
//!
//! Pulls paginated GitHub REST collections and hands them out as a lazy
//! stream of JSON records.
//!
//! ## Features
//!
//! - **Page-number pagination**: `?per_page=100&page=N` until an empty page
//! - **Lazy**: nothing is requested until the consumer pulls the next record
//! - **Token auth**: Bearer, `token` or Basic, identity as User-Agent
//! - **Pluggable sources**: a registry mapping names to source factories
//! - **Snapshot loader**: one-shot POST query returning its `data` rows
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//! use gitsync_source::{Credentials, FetchConfig, PagedFetcher, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let credentials = Credentials::from_env("GITSYNC_USERNAME", "GITSYNC_PASSWORD")?;
//!     let fetcher = PagedFetcher::new(FetchConfig::new(credentials))?;
//!
//!     let mut commits = fetcher.fetch_all("octocat/hello-world", "commits")?;
//!     while let Some(commit) = commits.try_next().await? {
//!         println!("{}", commit["sha"]);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  SourceRegistry: name + locator → Box<dyn Source>        │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────────────────────────────────────────────────┐
//! │  PagedFetcher → PageCursor → RecordStream                │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────┬───────────┬──────────────┬────────────────────┐
//! │   Auth   │   HTTP    │   Paginate   │   Decode           │
//! ├──────────┼───────────┼──────────────┼────────────────────┤
//! │ Bearer   │ GET/POST  │ Page number  │ JSON array         │
//! │ Token    │ Rate limit│ Empty page   │ Single object      │
//! │ Basic    │ Timeout   │ Short page   │ Record path        │
//! │ API key  │           │              │                    │
//! └──────────┴───────────┴──────────────┴────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication
pub mod auth;

/// HTTP client with rate limiting
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Response decoders
pub mod decode;

/// Paginated fetch engine
pub mod engine;

/// Source configuration
pub mod config;

/// Source trait and registry
pub mod source;

/// One-shot snapshot loader
pub mod snapshot;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use auth::{AuthScheme, Credentials};
pub use config::SourceConfig;
pub use engine::{CheckResult, FetchConfig, PageCursor, PagedFetcher};
pub use source::{RecordStream, Source, SourceParams, SourceRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
