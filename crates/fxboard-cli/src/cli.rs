//! CLI argument definitions for fxboard.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rates` | Fetch the board once and print it |
//! | `board` | Interactive board with manual refresh |
//! | `relays` | List the relay chain in attempt order |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | env or `10000` | Per-relay attempt timeout in ms |
//! | `--model` | env or `gemini-2.5-flash` | Completion model |
//! | `--target-url` | env or bank page | Page to fetch |
//!
//! # Examples
//!
//! ```bash
//! fxboard rates
//! fxboard rates --show-spot --format json --pretty
//! fxboard board
//! fxboard relays
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Bank of Taiwan exchange-rate board.
///
/// Fetches the bank's public rate page through a chain of relays, extracts
/// the rate table with Gemini, and prints normalized buy/sell/mid rates.
#[derive(Debug, Parser)]
#[command(
    name = "fxboard",
    author,
    version,
    about = "Bank of Taiwan exchange-rate board",
    long_about = "fxboard fetches the Bank of Taiwan rate page through public relays, \
extracts the rate table with a generative model and prints normalized rates.\n\
\n\
The API key is read from FXBOARD_GEMINI_API_KEY, GEMINI_API_KEY or API_KEY.\n\
\n\
Use 'fxboard <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Per-relay attempt timeout in milliseconds (1000..=60000).
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Gemini model used for extraction.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Page to fetch instead of the Bank of Taiwan board.
    #[arg(long, global = true)]
    pub target_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table for terminal display.
    Table,
    /// Single JSON envelope.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the rate board once.
    ///
    /// # Examples
    ///
    ///   fxboard rates
    ///   fxboard rates --show-spot
    ///   fxboard rates --format json --pretty
    Rates(RatesArgs),

    /// Interactive board: Enter refreshes, 's' toggles spot, 'q' quits.
    ///
    /// A failed refresh keeps the previous table on screen.
    Board(BoardArgs),

    /// List relays in the order they are attempted.
    Relays,
}

#[derive(Debug, Args)]
pub struct RatesArgs {
    /// Include spot buy/sell/mid columns.
    #[arg(long, default_value_t = false)]
    pub show_spot: bool,
}

#[derive(Debug, Args)]
pub struct BoardArgs {
    /// Start with spot columns visible.
    #[arg(long, default_value_t = false)]
    pub show_spot: bool,
}
