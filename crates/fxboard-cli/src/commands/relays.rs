use serde::Serialize;

use fxboard_core::{duration_ms, ContentShape, RatePipeline};

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct RelayRow {
    position: usize,
    name: &'static str,
    shape: ContentShape,
    url: String,
}

#[derive(Debug, Serialize)]
struct RelaysResponseData {
    target_url: String,
    attempt_timeout_ms: u64,
    relays: Vec<RelayRow>,
}

pub fn run(pipeline: &RatePipeline) -> Result<CommandResult, CliError> {
    let relays = pipeline
        .relays()
        .iter()
        .enumerate()
        .map(|(index, relay)| RelayRow {
            position: index + 1,
            name: relay.name,
            shape: relay.shape,
            url: relay.relay_url(pipeline.target_url()),
        })
        .collect::<Vec<_>>();

    let mut table = format!("{:<3}  {:<16}  {:<9}  URL\n", "#", "RELAY", "SHAPE");
    for row in &relays {
        table.push_str(&format!(
            "{:<3}  {:<16}  {:<9}  {}\n",
            row.position,
            row.name,
            row.shape.as_str(),
            row.url
        ));
    }

    let data = serde_json::to_value(RelaysResponseData {
        target_url: pipeline.target_url().to_owned(),
        attempt_timeout_ms: duration_ms(pipeline.attempt_timeout()),
        relays,
    })?;

    Ok(CommandResult::ok(data).with_table(table))
}
