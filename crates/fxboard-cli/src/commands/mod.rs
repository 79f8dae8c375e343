mod board;
mod rates;
mod relays;

use std::process::ExitCode;

use fxboard_core::{Envelope, EnvelopeError, PipelineConfig, RatePipeline, UtcDateTime};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;
use crate::output;

pub struct CommandResult {
    pub data: Value,
    pub table: Option<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
    pub relay_chain: Vec<String>,
    pub generated_at: Option<UtcDateTime>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            table: None,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
            relay_chain: Vec::new(),
            generated_at: None,
        }
    }

    pub fn with_table(mut self, table: String) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_relay_chain(mut self, relay_chain: Vec<String>) -> Self {
        self.relay_chain = relay_chain;
        self
    }

    pub fn with_generated_at(mut self, generated_at: UtcDateTime) -> Self {
        self.generated_at = Some(generated_at);
        self
    }
}

/// Applies the global flag overrides on top of the environment.
pub fn resolve_config(cli: &Cli) -> Result<PipelineConfig, CliError> {
    let mut config = PipelineConfig::from_env()?;

    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_attempt_timeout_ms(timeout_ms)?;
    }
    if let Some(model) = &cli.model {
        config = config.with_model(model.as_str())?;
    }
    if let Some(url) = &cli.target_url {
        config = config.with_target_url(url.as_str())?;
    }

    Ok(config)
}

pub async fn run(
    cli: &Cli,
    config: PipelineConfig,
    cancel: &CancellationToken,
) -> Result<ExitCode, CliError> {
    let pipeline = RatePipeline::builder(config).build();

    let command_result = match &cli.command {
        Command::Board(args) => return board::run(args, &pipeline, cancel).await,
        Command::Rates(args) => rates::run(args, &pipeline, cancel).await?,
        Command::Relays => relays::run(&pipeline)?,
    };

    finish(cli, command_result)
}

fn finish(cli: &Cli, command_result: CommandResult) -> Result<ExitCode, CliError> {
    let CommandResult {
        data,
        table,
        warnings,
        errors,
        latency_ms,
        relay_chain,
        generated_at,
    } = command_result;

    let mut metadata = Metadata::new(relay_chain, latency_ms);
    metadata.generated_at = generated_at;
    for warning in warnings {
        metadata.push_warning(warning);
    }

    let has_errors = !errors.is_empty();
    let envelope = Envelope::with_errors(metadata.into_envelope_meta(), data, errors);
    output::render(&envelope, table.as_deref(), cli.format, cli.pretty)?;

    if has_errors {
        return Ok(ExitCode::from(3));
    }

    Ok(ExitCode::SUCCESS)
}
