use std::io::{self, BufRead};
use std::process::ExitCode;

use fxboard_core::{RateBoard, RatePipeline};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::cli::BoardArgs;
use crate::error::CliError;
use crate::output;

const PROMPT: &str = "[Enter] refresh  [s] toggle spot  [q] quit";
const INPUT_BUFFER: usize = 8;

type InputLines = mpsc::Receiver<io::Result<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoardInput {
    Refresh,
    ToggleSpot,
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> BoardInput {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "r" => BoardInput::Refresh,
        "s" => BoardInput::ToggleSpot,
        "q" | "quit" | "exit" => BoardInput::Quit,
        _ => BoardInput::Unknown,
    }
}

pub async fn run(
    args: &BoardArgs,
    pipeline: &RatePipeline,
    cancel: &CancellationToken,
) -> Result<ExitCode, CliError> {
    if !pipeline.has_credential() {
        return Err(CliError::MissingCredential);
    }

    let mut board = RateBoard::new();
    if args.show_spot {
        board.toggle_spot();
    }
    let mut input = spawn_line_reader();

    drive(&mut board, pipeline, cancel, &mut input).await?;
    Ok(ExitCode::SUCCESS)
}

/// Reads stdin on a detached OS thread.
///
/// A blocking read can't be interrupted, so it must not live on the runtime:
/// the process exits on Ctrl-C even while a line is still pending.
fn spawn_line_reader() -> InputLines {
    let (sender, receiver) = mpsc::channel(INPUT_BUFFER);
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if sender.blocking_send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

/// Runs the board until quit, end of input, or cancellation.
async fn drive(
    board: &mut RateBoard,
    pipeline: &RatePipeline,
    cancel: &CancellationToken,
    input: &mut InputLines,
) -> Result<(), CliError> {
    refresh(board, pipeline, cancel).await;

    loop {
        if cancel.is_cancelled() {
            return Err(CliError::Cancelled);
        }
        print!("{}", output::board_view(board));
        println!("{PROMPT}");

        let line = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CliError::Cancelled),
            line = input.recv() => line,
        };
        let Some(line) = line.transpose()? else {
            return Ok(());
        };

        match parse_input(&line) {
            BoardInput::Refresh => refresh(board, pipeline, cancel).await,
            BoardInput::ToggleSpot => {
                board.toggle_spot();
            }
            BoardInput::Quit => return Ok(()),
            BoardInput::Unknown => warn!(input = line.trim(), "unrecognized board command"),
        }
    }
}

async fn refresh(board: &mut RateBoard, pipeline: &RatePipeline, cancel: &CancellationToken) {
    if !board.begin_refresh() {
        return;
    }
    println!("refreshing...");
    let outcome = pipeline.refresh(cancel).await;
    board.apply(outcome);
}
