use fxboard_core::domain::currency::display_name;
use fxboard_core::{format_rate, CalculatedRate, Envelope, RateBoard};
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    table: Option<&str>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(envelope, table)?,
    }

    Ok(())
}

fn render_table(envelope: &Envelope<Value>, table: Option<&str>) -> Result<(), CliError> {
    println!("request_id  : {}", envelope.meta.request_id);
    println!("generated_at: {}", envelope.meta.generated_at);
    if !envelope.meta.relay_chain.is_empty() {
        println!("relays      : {}", envelope.meta.relay_chain.join(" -> "));
    }
    println!("latency_ms  : {}", envelope.meta.latency_ms);

    if !envelope.meta.warnings.is_empty() {
        println!("warnings:");
        for warning in &envelope.meta.warnings {
            println!("  - {warning}");
        }
    }

    match table {
        Some(table) => {
            println!();
            print!("{table}");
        }
        None => {
            println!("data:");
            let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
            for line in pretty_data.lines() {
                println!("  {line}");
            }
        }
    }

    if !envelope.errors.is_empty() {
        println!("errors:");
        for error in &envelope.errors {
            println!("  - {}: {}", error.code, error.message);
        }
    }

    Ok(())
}

/// Fixed-width rate table. The name column comes last since CJK glyphs
/// break width-based alignment.
pub fn rates_table(rates: &[CalculatedRate], show_spot: bool) -> String {
    let mut header = vec!["CCY", "CASH BUY", "CASH SELL", "CASH MID"];
    if show_spot {
        header.extend(["SPOT BUY", "SPOT SELL", "SPOT MID"]);
    }
    header.push("NAME");

    let mut lines = vec![format_row(&header)];
    for rate in rates {
        let mut cells = vec![
            rate.currency().to_owned(),
            format_rate(rate.rate.cash_buy),
            format_rate(rate.rate.cash_sell),
            format_rate(rate.cash_mid),
        ];
        if show_spot {
            cells.extend([
                format_rate(rate.rate.spot_buy),
                format_rate(rate.rate.spot_sell),
                format_rate(rate.spot_mid),
            ]);
        }
        cells.push(currency_label(rate));
        lines.push(format_row(&cells));
    }

    if rates.is_empty() {
        lines.push(String::from("(no rates)"));
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

/// Full-screen view of the interactive board.
pub fn board_view(board: &RateBoard) -> String {
    let mut out = String::new();
    let updated = board
        .last_updated()
        .map_or_else(|| String::from("never"), |at| at.clock_label());
    out.push_str(&format!("Bank of Taiwan board rates (updated {updated})\n"));

    if board.is_loading() {
        out.push_str("refreshing...\n");
    }
    if let Some(error) = board.error() {
        out.push_str(&format!("error: {error}\n"));
    }
    for warning in board.warnings() {
        out.push_str(&format!("warning: {warning}\n"));
    }

    out.push('\n');
    out.push_str(&rates_table(board.rates(), board.show_spot()));
    out
}

fn currency_label(rate: &CalculatedRate) -> String {
    if rate.rate.currency_name.trim().is_empty() {
        display_name(rate.currency()).unwrap_or_default().to_owned()
    } else {
        rate.rate.currency_name.clone()
    }
}

fn format_row<S: AsRef<str>>(cells: &[S]) -> String {
    let (last, rest) = match cells.split_last() {
        Some(split) => split,
        None => return String::new(),
    };
    let mut row = rest
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            if index == 0 {
                format!("{:<5}", cell.as_ref())
            } else {
                format!("{:>10}", cell.as_ref())
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    row.push_str("  ");
    row.push_str(last.as_ref());
    row
}
