//! Scheduling driver
//!
//! Owns the [`Session`] and is the only thing that touches it. Ticks and
//! user commands are serialized through a single `select!` loop, so the
//! engine never sees two inputs at once. The clock is an owned
//! [`Ticker`] that exists only while the session wants ticks.

pub mod session;
pub mod ticker;

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::WorkoutConfig;
use crate::cue::CueSink;
use crate::display::DisplaySink;
use crate::duration::total_seconds;
use crate::error::DriverError;
use crate::observability::metrics;
use crate::observability::{Event, EventEmitter, StopReason, WorkoutRecord};

pub use session::{Session, Step};
pub use ticker::{DEFAULT_PERIOD, MIN_PERIOD, Ticker};

/// Capacity of the command channel.
const COMMAND_BUFFER: usize = 16;

/// User commands accepted by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Begin the lead-in.
    Start,
    /// Pause the running workout.
    Pause,
    /// Resume a paused workout.
    Resume,
    /// Pause or resume, whichever applies.
    TogglePause,
    /// Back to idle from anywhere.
    Reset,
    /// Replace the workout settings (forces a reset).
    Reconfigure(WorkoutConfig),
    /// Stop the driver.
    Quit,
}

impl Command {
    /// Keywords understood by [`Command::from_keyword`].
    pub const KEYWORDS: [&'static str; 7] =
        ["start", "pause", "resume", "p", "reset", "quit", "q"];

    /// Maps a typed keyword to a command.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.trim().to_ascii_lowercase().as_str() {
            "start" | "s" => Some(Self::Start),
            "pause" => Some(Self::Pause),
            "resume" => Some(Self::Resume),
            "p" | "toggle" => Some(Self::TogglePause),
            "reset" | "r" => Some(Self::Reset),
            "quit" | "q" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Sending half of the driver's command channel.
#[derive(Debug, Clone)]
pub struct DriverHandle {
    tx: mpsc::Sender<Command>,
}

impl DriverHandle {
    /// Sends a command to the driver.
    ///
    /// # Errors
    ///
    /// `DriverError::ChannelClosed` if the driver has stopped.
    pub async fn send(&self, command: Command) -> Result<(), DriverError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| DriverError::ChannelClosed)
    }
}

/// Creates a command channel for a driver.
#[must_use]
pub fn channel() -> (DriverHandle, mpsc::Receiver<Command>) {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    (DriverHandle { tx }, rx)
}

/// Async scheduling driver.
pub struct Driver {
    session: Session,
    display: Box<dyn DisplaySink>,
    cues: Box<dyn CueSink>,
    events: EventEmitter,
    period: Duration,
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("session", &self.session)
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

impl Driver {
    /// Creates a driver ticking once per second.
    #[must_use]
    pub fn new(
        session: Session,
        display: Box<dyn DisplaySink>,
        cues: Box<dyn CueSink>,
        events: EventEmitter,
    ) -> Self {
        Self {
            session,
            display,
            cues,
            events,
            period: DEFAULT_PERIOD,
        }
    }

    /// Overrides the clock period. Periods below [`MIN_PERIOD`] are
    /// raised to it.
    #[must_use]
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period.max(MIN_PERIOD);
        self
    }

    /// Starts the lead-in. Used before [`run`](Self::run) when the
    /// caller wants a refused start reported rather than logged.
    ///
    /// # Errors
    ///
    /// Whatever [`Session::start`] refuses with.
    pub fn start(&mut self) -> Result<(), DriverError> {
        let step = self.session.start()?;
        self.events.emit(Event::WorkoutStarted {
            timestamp: Utc::now(),
            run_id: self.session.run_id().unwrap_or_default(),
            lead_in: self.session.config().lead_in,
        });
        info!("workout started");
        self.apply(&step);
        Ok(())
    }

    /// Runs until the workout completes, `Quit` arrives, the command
    /// channel closes, or `cancel` fires.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        cancel: CancellationToken,
    ) -> StopReason {
        let mut ticker: Option<Ticker> = None;
        self.render();

        let reason = loop {
            self.sync_ticker(&mut ticker);

            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    debug!("driver cancelled");
                    break StopReason::Cancelled;
                }
                command = commands.recv() => match command {
                    None => break StopReason::InputClosed,
                    Some(Command::Quit) => break StopReason::Quit,
                    Some(command) => self.handle(command),
                },
                () = next_tick(&mut ticker) => {
                    let step = self.session.tick();
                    let completed = step.completed();
                    self.apply(&step);
                    self.render();
                    if completed {
                        break StopReason::Completed;
                    }
                }
            }
        };

        if let Some(t) = ticker.take() {
            t.cancel();
        }
        self.events.emit(Event::RunStopped {
            timestamp: Utc::now(),
            reason,
        });
        info!(?reason, "driver stopped");
        reason
    }

    fn sync_ticker(&self, ticker: &mut Option<Ticker>) {
        match (self.session.wants_ticks(), ticker.is_some()) {
            (true, false) => *ticker = Some(Ticker::start(self.period)),
            (false, true) => {
                if let Some(t) = ticker.take() {
                    t.cancel();
                }
            }
            _ => {}
        }
    }

    fn handle(&mut self, command: Command) {
        debug!(?command, "command");
        match command {
            Command::Start => {
                if let Err(e) = self.start() {
                    warn!(error = %e, "start ignored");
                }
            }
            Command::Pause => {
                if self.session.pause() {
                    self.paused_changed(true);
                }
            }
            Command::Resume => {
                if self.session.resume() {
                    self.paused_changed(false);
                }
            }
            Command::TogglePause => {
                if self.session.toggle_pause() {
                    self.paused_changed(self.session.state().paused);
                }
            }
            Command::Reset => {
                let run_id = self.session.reset();
                self.reset_done(run_id);
            }
            Command::Reconfigure(workout) => {
                let run_id = self.session.run_id();
                match self.session.reconfigure(workout) {
                    Ok(warnings) => {
                        for w in &warnings {
                            warn!("{w}");
                        }
                        self.reset_done(run_id);
                    }
                    Err(e) => warn!(error = %e, "configuration change rejected"),
                }
            }
            Command::Quit => {}
        }
        self.render();
    }

    fn paused_changed(&self, paused: bool) {
        let run_id = self.session.run_id().unwrap_or_default();
        let remaining_seconds = self.session.state().remaining_seconds;
        let timestamp = Utc::now();
        self.events.emit(if paused {
            Event::WorkoutPaused {
                timestamp,
                run_id,
                remaining_seconds,
            }
        } else {
            Event::WorkoutResumed {
                timestamp,
                run_id,
                remaining_seconds,
            }
        });
        metrics::set_paused(paused);
        info!(paused, remaining_seconds, "pause toggled");
    }

    fn reset_done(&self, run_id: Option<uuid::Uuid>) {
        self.events.emit(Event::WorkoutReset {
            timestamp: Utc::now(),
            run_id,
        });
        metrics::set_paused(false);
        info!("workout reset");
    }

    fn apply(&mut self, step: &Step) {
        let state = self.session.state();
        let run_id = self.session.run_id().unwrap_or_default();

        if step.ticked {
            metrics::record_tick(state.remaining_seconds);
        }
        if let Some(t) = &step.transition {
            metrics::record_transition(t);
        }
        if let Some(phase) = step.entered() {
            self.events.emit(Event::PhaseEntered {
                timestamp: Utc::now(),
                run_id,
                phase,
                round: state.round,
                circuit: state.circuit,
            });
        }

        for &cue in &step.cues {
            metrics::record_cue(cue);
            self.events.emit(Event::CueRequested {
                timestamp: Utc::now(),
                run_id,
                cue,
            });
            self.cues.play(cue);
        }

        if step.completed() {
            let intervals = self.session.config().workout.intervals();
            self.events.emit(Event::WorkoutCompleted {
                timestamp: Utc::now(),
                run_id,
                workout: WorkoutRecord {
                    work_seconds: intervals.work,
                    rest_seconds: intervals.rest,
                    rounds: intervals.rounds,
                    circuits: intervals.circuits,
                    total_seconds: total_seconds(&intervals),
                },
            });
            info!("workout complete");
        }
    }

    fn render(&mut self) {
        let frame = self.session.frame();
        self.display.render(&frame);
    }
}

async fn next_tick(ticker: &mut Option<Ticker>) {
    match ticker {
        Some(t) => t.tick().await,
        None => std::future::pending().await,
    }
}
