//! Display sinks
//!
//! The driver hands a [`Frame`] to a [`DisplaySink`] after every state
//! change. Rendering is the sink's business; the frame carries everything
//! a display needs so sinks never reach back into the engine.

use std::io::Write;

use serde::Serialize;

use crate::config::WorkoutConfig;
use crate::duration::{format_clock, phase_progress};
use crate::phase::{Phase, WorkoutState};

/// Width of the terminal progress bar in cells.
const BAR_WIDTH: usize = 20;

/// Driver mode, as seen by displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Not started, reset, or finished.
    Idle,
    /// Lead-in countdown running.
    LeadIn,
    /// Phase engine running (possibly paused).
    Active,
}

/// Snapshot handed to display sinks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Driver mode.
    pub mode: Mode,
    /// Lead-in number while counting down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_in: Option<u32>,
    /// Current phase.
    pub phase: Phase,
    /// Seconds until the next boundary.
    pub remaining_seconds: u32,
    /// Remaining time as `MM:SS`.
    pub clock: String,
    /// Round counter.
    pub round: u32,
    /// Rounds per circuit.
    pub rounds: u32,
    /// Circuit counter.
    pub circuit: u32,
    /// Number of circuits.
    pub circuits: u32,
    /// Elapsed fraction of the current phase.
    pub progress: f64,
    /// Paused flag.
    pub paused: bool,
    /// The run has finished.
    pub complete: bool,
    /// Exercise for the current (Work) or upcoming (rests) round.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise: Option<String>,
}

impl Frame {
    /// Builds a frame from the driver's view of the world.
    #[must_use]
    pub fn build(
        mode: Mode,
        lead_in: Option<u32>,
        workout: &WorkoutConfig,
        state: &WorkoutState,
    ) -> Self {
        let intervals = workout.intervals();
        Self {
            mode,
            lead_in,
            phase: state.phase,
            remaining_seconds: state.remaining_seconds,
            clock: format_clock(state.remaining_seconds),
            round: state.round,
            rounds: intervals.rounds,
            circuit: state.circuit,
            circuits: intervals.circuits,
            progress: phase_progress(&intervals, state),
            paused: state.paused,
            complete: state.complete,
            exercise: exercise_for(workout, state).map(str::to_owned),
        }
    }
}

/// During Work the round counter is the current round; during rests it
/// already points at the next one (and past the end between circuits).
fn exercise_for<'a>(workout: &'a WorkoutConfig, state: &WorkoutState) -> Option<&'a str> {
    if state.complete {
        return None;
    }
    let round = match state.phase {
        Phase::BetweenCircuitsRest => 1,
        Phase::Work | Phase::Rest => state.round,
    };
    workout.exercise_for_round(round)
}

/// Receives frames from the driver.
pub trait DisplaySink: Send {
    /// Renders one frame.
    fn render(&mut self, frame: &Frame);
}

/// Human-readable terminal display.
///
/// In inline mode each frame overwrites the previous line.
pub struct TerminalDisplay {
    writer: Box<dyn Write + Send>,
    inline: bool,
}

impl TerminalDisplay {
    /// Creates a display writing to `writer`.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, inline: bool) -> Self {
        Self { writer, inline }
    }

    /// Creates a display on stdout, inline when stdout is a terminal.
    #[must_use]
    pub fn stdout() -> Self {
        use std::io::IsTerminal;
        let inline = std::io::stdout().is_terminal();
        Self::new(Box::new(std::io::stdout()), inline)
    }

    /// Renders a frame to a single line of text (no line terminator).
    #[must_use]
    pub fn line(frame: &Frame) -> String {
        if let Some(n) = frame.lead_in {
            return format!("Get ready... {n}");
        }
        if frame.complete {
            return format!(
                "Workout complete! Circuit {}/{} | Round {}/{}",
                frame.circuits, frame.circuits, frame.rounds, frame.rounds
            );
        }

        let mut line = format!(
            "[{:<12}] {}  Circuit: {}/{} | Round: {}/{}  {}",
            frame.phase.to_string(),
            frame.clock,
            frame.circuit,
            frame.circuits,
            frame.round,
            frame.rounds,
            bar(frame.progress),
        );
        if let Some(exercise) = &frame.exercise {
            let prefix = if frame.phase.is_work() { "" } else { "next: " };
            line.push_str(&format!("  {prefix}{exercise}"));
        }
        if frame.paused {
            line.push_str("  (paused)");
        }
        line
    }
}

fn bar(progress: f64) -> String {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((progress.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

impl std::fmt::Debug for TerminalDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalDisplay")
            .field("inline", &self.inline)
            .finish_non_exhaustive()
    }
}

impl DisplaySink for TerminalDisplay {
    fn render(&mut self, frame: &Frame) {
        let line = Self::line(frame);
        let _ = if self.inline {
            let end = if frame.complete { "\n" } else { "" };
            write!(self.writer, "\r\x1b[2K{line}{end}")
        } else {
            writeln!(self.writer, "{line}")
        };
        let _ = self.writer.flush();
    }
}

/// Newline-delimited JSON frames, for other programs to consume.
pub struct JsonDisplay {
    writer: Box<dyn Write + Send>,
}

impl JsonDisplay {
    /// Creates a display writing JSON lines to `writer`.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self { writer }
    }

    /// Creates a display on stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }
}

impl std::fmt::Debug for JsonDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonDisplay").finish_non_exhaustive()
    }
}

impl DisplaySink for JsonDisplay {
    fn render(&mut self, frame: &Frame) {
        if let Ok(line) = serde_json::to_string(frame) {
            let _ = writeln!(self.writer, "{line}");
            let _ = self.writer.flush();
        }
    }
}

/// Discards frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn render(&mut self, _frame: &Frame) {}
}
