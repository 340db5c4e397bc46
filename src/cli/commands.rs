//! CLI commands and argument parsing

use crate::error::{Error, Result};
use crate::source::{SourceParams, GITHUB_SOURCE};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Pull paginated GitHub REST collections as JSON records
#[derive(Parser, Debug)]
#[command(name = "gitsync-source")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which collection to fetch, either as flags or as a locator
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Collection identifier, e.g. octocat/hello-world
    #[arg(long)]
    pub repo: Option<String>,

    /// Sub-resource, e.g. commits, issues, pulls
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Locator query string, e.g. 'repo=octocat/hello-world&endpoint=commits'
    #[arg(long, conflicts_with_all = ["repo", "endpoint"])]
    pub locator: Option<String>,
}

impl TargetArgs {
    /// Resolve into source parameters
    pub fn params(&self) -> Result<SourceParams> {
        if let Some(locator) = &self.locator {
            return SourceParams::from_locator(locator);
        }

        let repo = self.repo.clone().ok_or_else(|| Error::missing_field("repo"))?;
        let endpoint = self
            .endpoint
            .clone()
            .ok_or_else(|| Error::missing_field("endpoint"))?;
        Ok(SourceParams::new(repo, endpoint))
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read every record of a collection
    Read {
        #[command(flatten)]
        target: TargetArgs,

        /// Registered source to read from
        #[arg(long, default_value = GITHUB_SOURCE)]
        source: String,

        /// Stop after this many records
        #[arg(long)]
        max_records: Option<usize>,

        /// Records per page (overrides config)
        #[arg(long)]
        page_size: Option<u32>,

        /// Write messages to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Make one request and report whether it succeeded
    Check {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Post a query payload once and print the returned data
    Snapshot {
        /// Endpoint config (JSON with API_URL, API_KEY, PAYLOAD)
        #[arg(long)]
        endpoint_config: PathBuf,

        /// Write messages to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List built-in sources
    List,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
