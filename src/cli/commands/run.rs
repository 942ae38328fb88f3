//! `run` command handler
//!
//! Wires the configured sinks to a [`Driver`], starts the workout, and
//! feeds typed commands from stdin until the driver stops.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::args::{DisplayMode, RunArgs};
use crate::cue::{BellSink, CueSink, LogCueSink};
use crate::display::{DisplaySink, JsonDisplay, NullDisplay, TerminalDisplay};
use crate::driver::{self, Command, Driver, DriverHandle, Session};
use crate::duration::WorkoutSummary;
use crate::error::TabataError;
use crate::observability::{EventEmitter, StopReason, init_metrics};

use super::resolve_settings;

/// Run a workout in the foreground.
///
/// # Errors
///
/// Returns a config error for invalid settings, an I/O error if the
/// events file or metrics listener cannot be set up, or a driver error if
/// the start is refused.
pub async fn run(args: &RunArgs, quiet: bool, cancel: CancellationToken) -> Result<(), TabataError> {
    if let Some(port) = args.metrics_port {
        init_metrics(Some(port))?;
        info!(port, "Prometheus metrics endpoint started");
    }

    let config = resolve_settings(&args.settings)?;

    if args.display == DisplayMode::Human && !quiet {
        println!("{}", WorkoutSummary::of(&config.workout.intervals()));
        println!("Commands: pause | resume | p (toggle) | reset | start | quit");
    }

    let display: Box<dyn DisplaySink> = match args.display {
        DisplayMode::Human => Box::new(TerminalDisplay::stdout()),
        DisplayMode::Json => Box::new(JsonDisplay::stdout()),
        DisplayMode::None => Box::new(NullDisplay),
    };
    let cues: Box<dyn CueSink> = if args.no_bell {
        Box::new(LogCueSink)
    } else {
        Box::new(BellSink::stderr())
    };
    let events = match &args.events_file {
        Some(path) => EventEmitter::from_file(path)?,
        None => EventEmitter::noop(),
    };

    let mut driver = Driver::new(Session::new(config), display, cues, events)
        .with_period(Duration::from_millis(args.tick_ms));
    driver.start()?;

    let (handle, commands) = driver::channel();
    let driver_task = tokio::spawn(driver.run(commands, cancel));
    let input_task = tokio::spawn(read_commands(handle.clone()));

    // `handle` stays alive until the driver stops, so closing stdin never
    // ends the workout.
    let reason = driver_task
        .await
        .map_err(|e| TabataError::Io(std::io::Error::other(e)))?;
    input_task.abort();
    drop(handle);

    match reason {
        StopReason::Completed => info!("workout finished"),
        StopReason::Quit | StopReason::Cancelled | StopReason::InputClosed => {
            info!(?reason, "workout stopped early");
        }
    }
    Ok(())
}

/// Reads one command per line from stdin.
async fn read_commands(handle: DriverHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let word = line.trim();
        if word.is_empty() {
            continue;
        }
        match Command::from_keyword(word) {
            Some(command) => {
                if handle.send(command).await.is_err() {
                    break;
                }
            }
            None => match suggest_command(word) {
                Some(hint) => warn!("unknown command '{word}', did you mean '{hint}'?"),
                None => warn!("unknown command '{word}'"),
            },
        }
    }
    debug!("command input closed");
}

/// Suggests a known command for a typo.
///
/// Returns the closest keyword if its Damerau-Levenshtein distance is ≤ 2.
#[must_use]
pub fn suggest_command(input: &str) -> Option<&'static str> {
    let input = input.to_ascii_lowercase();
    Command::KEYWORDS
        .iter()
        .filter(|k| k.len() > 1)
        .map(|k| (*k, strsim::damerau_levenshtein(&input, k)))
        .filter(|(_, dist)| *dist <= 2)
        .min_by_key(|(_, dist)| *dist)
        .map(|(k, _)| k)
}
