//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, TargetArgs};
use crate::config::SourceConfig;
use crate::engine::PagedFetcher;
use crate::error::{Result, ResultExt};
use crate::http::HttpClientConfig;
use crate::snapshot::{fetch_snapshot, SnapshotConfig};
use crate::source::{into_record_stream, SourceRegistry, BUILTIN_SOURCES};
use crate::types::{LogLevel, Record};
use futures::TryStreamExt;
use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Read {
                target,
                source,
                max_records,
                page_size,
                output,
            } => {
                let mut out = open_output(output.as_deref())?;
                self.read(target, source, *max_records, *page_size, &mut out)
                    .await?;
                out.flush()?;
            }
            Commands::Check { target } => {
                let mut out = open_output(None)?;
                self.check(target, &mut out).await?;
                out.flush()?;
            }
            Commands::Snapshot {
                endpoint_config,
                output,
            } => {
                let mut out = open_output(output.as_deref())?;
                self.snapshot(endpoint_config, &mut out).await?;
                out.flush()?;
            }
            Commands::List => {
                let mut out = open_output(None)?;
                self.list(&mut out)?;
                out.flush()?;
            }
        }
        Ok(())
    }

    /// Load the source configuration, applying CLI overrides
    fn load_config(&self, page_size: Option<u32>) -> Result<SourceConfig> {
        let mut config = match &self.cli.config {
            Some(path) => SourceConfig::from_file(path)?,
            None => SourceConfig::default(),
        };

        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(size) = page_size {
            config.page_size = size;
        }

        config.validate()?;
        Ok(config)
    }

    /// Resolve credentials from the environment and build the fetcher
    fn build_fetcher(&self, config: &SourceConfig) -> Result<PagedFetcher> {
        let credentials = config.credentials_from_env()?;
        PagedFetcher::new(config.fetch_config(Some(credentials)))
    }

    /// Read all records of a collection
    ///
    /// Returns the number of records written.
    pub async fn read(
        &self,
        target: &TargetArgs,
        source: &str,
        max_records: Option<usize>,
        page_size: Option<u32>,
        out: &mut dyn Write,
    ) -> Result<usize> {
        let started = Instant::now();
        let params = target.params()?;
        let config = self.load_config(page_size)?;
        let fetcher = self.build_fetcher(&config)?;

        let registry = SourceRegistry::with_github(fetcher);
        let stream_name = params.subresource.clone();
        let mut records = into_record_stream(registry.create_with(source, &params)?);

        self.output_message(
            out,
            &log_message(
                LogLevel::Info,
                format!(
                    "Starting read of {}/{} from {source}",
                    params.collection, params.subresource
                ),
            ),
        )?;

        let mut count = 0usize;
        loop {
            if max_records.is_some_and(|max| count >= max) {
                info!(records = count, "Reached max records, stopping");
                break;
            }
            let Some(record) = records.try_next().await? else {
                break;
            };
            self.output_message(out, &record_message(&stream_name, record))?;
            count += 1;
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(records = count, elapsed_ms, "Read complete");
        self.output_message(
            out,
            &log_message(
                LogLevel::Info,
                format!("Read {count} records from {stream_name} in {elapsed_ms}ms"),
            ),
        )?;

        Ok(count)
    }

    /// Check connectivity with a single request
    pub async fn check(&self, target: &TargetArgs, out: &mut dyn Write) -> Result<bool> {
        let params = target.params()?;
        let config = self.load_config(None)?;
        let fetcher = self.build_fetcher(&config)?;

        let result = fetcher
            .check(&params.collection, &params.subresource)
            .await?;

        if !result.success {
            warn!(status = result.status, "Connection check failed");
        }

        self.output_message(
            out,
            &json!({
                "type": "CONNECTION_STATUS",
                "connectionStatus": {
                    "status": if result.success { "SUCCEEDED" } else { "FAILED" },
                    "httpStatus": result.status,
                    "message": result.message,
                    "sample": result.sample,
                }
            }),
        )?;

        Ok(result.success)
    }

    /// Post the snapshot query and print its records
    pub async fn snapshot(&self, endpoint_config: &Path, out: &mut dyn Write) -> Result<usize> {
        let snapshot = SnapshotConfig::from_file(endpoint_config)?;

        let mut http = HttpClientConfig::builder();
        if let Some(config_path) = &self.cli.config {
            let config = SourceConfig::from_file(config_path)?;
            if let Some(secs) = config.timeout_seconds {
                http = http.timeout(std::time::Duration::from_secs(secs));
            }
        }

        let client = snapshot.client(http.build())?;
        let records = fetch_snapshot(&client, &snapshot).await?;
        let count = records.len();

        for record in records {
            self.output_message(out, &record_message("snapshot", record))?;
        }
        Ok(count)
    }

    /// List built-in sources
    pub fn list(&self, out: &mut dyn Write) -> Result<()> {
        let sources: Vec<Value> = BUILTIN_SOURCES
            .iter()
            .map(|(name, description)| json!({"name": name, "description": description}))
            .collect();

        self.output_message(out, &json!({"type": "SOURCES", "sources": sources}))
    }

    /// Output a message
    fn output_message(&self, out: &mut dyn Write, msg: &Value) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(msg)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(msg)?,
        };
        writeln!(out, "{line}")?;
        Ok(())
    }
}

/// Open the output destination: a file if given, stdout otherwise
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(std::io::stdout()))),
    }
}

fn record_message(stream: &str, record: Record) -> Value {
    json!({
        "type": "RECORD",
        "record": {
            "stream": stream,
            "data": record,
            "emitted_at": chrono::Utc::now().timestamp_millis()
        }
    })
}

fn log_message(level: LogLevel, message: impl Into<String>) -> Value {
    json!({
        "type": "LOG",
        "log": {
            "level": level,
            "message": message.into()
        }
    })
}
