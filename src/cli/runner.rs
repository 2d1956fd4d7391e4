//! CLI runner - executes commands

use crate::auth::Authenticator;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::TapConfig;
use crate::engine::{Selection, StreamRunner};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::output::{JsonLinesSink, ParquetSink, RecordSink};
use crate::pagination::Paginator;
use crate::resources::Catalog;
use crate::state::StateManager;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Default directory for parquet output
const DEFAULT_OUTPUT_DIR: &str = "output";

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
            Commands::Check => self.check().await,
            Commands::Discover => {
                self.output_message(&catalog_json(&Catalog::learndash()));
                Ok(())
            }
            Commands::Streams => {
                self.output_message(&streams_json(&Catalog::learndash()));
                Ok(())
            }
            Commands::Read { streams, output } => {
                self.read(streams.as_deref(), output.as_deref()).await
            }
        }
    }

    /// Load configuration, inline JSON first
    fn load_config(&self) -> Result<TapConfig> {
        if let Some(json_str) = &self.cli.config_json {
            return TapConfig::from_json(json_str);
        }

        if let Some(path) = &self.cli.config {
            return TapConfig::from_file(path);
        }

        Err(Error::config(
            "No configuration given (use -C <file> or --config-json)",
        ))
    }

    /// Load state, inline JSON first
    ///
    /// File-backed state is written at checkpoints only.
    fn load_state(&self) -> Result<StateManager> {
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            Ok(StateManager::from_file(path)?.with_auto_save(false))
        } else {
            Ok(StateManager::in_memory())
        }
    }

    /// Check connection
    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let runner = build_stream_runner(&config, StateManager::in_memory())?;

        info!("Checking connection to {}", config.api_url);

        match runner.check().await {
            Ok(rows) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "SUCCEEDED",
                        "message": format!("Connection successful ({rows} courses on first page)")
                    }
                }));
                Ok(())
            }
            Err(e) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "FAILED",
                        "message": format!("Connection failed: {e}")
                    }
                }));
                Err(e)
            }
        }
    }

    /// Read streams into the selected sink
    async fn read(&self, streams: Option<&str>, output: Option<&Path>) -> Result<()> {
        let config = self.load_config()?;
        let state = self.load_state()?;
        let runner = build_stream_runner(&config, state)?;
        let selection = Selection::parse(streams);

        let mut sink: Box<dyn RecordSink> = match (self.cli.format, output) {
            (OutputFormat::Parquet, _) | (_, Some(_)) => Box::new(ParquetSink::new(
                output.unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_DIR)),
            )?),
            (OutputFormat::Pretty, None) => Box::new(JsonLinesSink::stdout(true)),
            (OutputFormat::Json, None) => Box::new(JsonLinesSink::stdout(false)),
        };

        let stats = runner.sync(&selection, sink.as_mut()).await?;

        for (stream, count) in &stats.records {
            info!("{stream}: {count} records");
        }
        Ok(())
    }

    /// Print a JSON document in the configured format
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
            OutputFormat::Json | OutputFormat::Parquet => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
        }
    }
}

/// Wire transport, authentication and pagination into a runner
pub fn build_stream_runner(config: &TapConfig, state: StateManager) -> Result<StreamRunner> {
    let client = HttpClient::with_config(config.http())?;
    let authenticator = Authenticator::new(config.auth()?, config.user_agent.as_deref())?;

    let paginator = Paginator::new(
        Arc::new(client),
        config.base_url()?,
        authenticator.headers().to_vec(),
        config.pagination(),
    );

    Ok(
        StreamRunner::new(Catalog::learndash(), paginator, state)
            .with_start_date(config.start_date.clone()),
    )
}

/// Catalog document printed by `discover`
pub fn catalog_json(catalog: &Catalog) -> Value {
    let streams: Vec<Value> = catalog
        .resources()
        .map(|resource| {
            json!({
                "tap_stream_id": resource.name,
                "stream": resource.name,
                "schema": resource.schema().to_json(),
                "key_properties": resource.key_fields,
                "parent": resource.parent,
                "replication_method": resource.replication_method(),
                "replication_key": resource.replication.map(|r| r.key),
                "ignore_parent_replication_keys": resource.ignore_parent_replication_keys,
            })
        })
        .collect();

    json!({ "streams": streams })
}

/// Stream list printed by `streams`
pub fn streams_json(catalog: &Catalog) -> Value {
    let streams: Vec<Value> = catalog
        .resources()
        .map(|resource| json!({ "name": resource.name, "parent": resource.parent }))
        .collect();

    json!({ "streams": streams })
}
