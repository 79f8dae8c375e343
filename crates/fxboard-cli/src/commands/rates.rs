use serde::Serialize;

use fxboard_core::{
    sorted_for_display, CalculatedRate, EnvelopeError, PipelineError, RatePipeline,
};
use tokio_util::sync::CancellationToken;

use crate::cli::RatesArgs;
use crate::error::CliError;
use crate::output;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct RatesResponseData {
    show_spot: bool,
    rates: Vec<CalculatedRate>,
}

pub async fn run(
    args: &RatesArgs,
    pipeline: &RatePipeline,
    cancel: &CancellationToken,
) -> Result<CommandResult, CliError> {
    if !pipeline.has_credential() {
        return Err(CliError::MissingCredential);
    }

    let outcome = pipeline.refresh(cancel).await;
    match outcome.result {
        Ok(snapshot) => {
            let relay_chain = snapshot.relay_chain();
            let rates = sorted_for_display(snapshot.rates);
            let table = output::rates_table(&rates, args.show_spot);
            let data = serde_json::to_value(RatesResponseData {
                show_spot: args.show_spot,
                rates,
            })?;

            Ok(CommandResult::ok(data)
                .with_table(table)
                .with_warnings(snapshot.warnings)
                .with_latency(snapshot.latency_ms)
                .with_relay_chain(relay_chain)
                .with_generated_at(outcome.completed_at))
        }
        Err(PipelineError::Cancelled) => Err(CliError::Cancelled),
        Err(error) => {
            let data = serde_json::to_value(RatesResponseData {
                show_spot: args.show_spot,
                rates: Vec::new(),
            })?;

            Ok(CommandResult::ok(data)
                .with_relay_chain(error.attempted_relays().to_vec())
                .with_errors(vec![EnvelopeError::from(&error)])
                .with_generated_at(outcome.completed_at))
        }
    }
}
