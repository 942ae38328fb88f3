//! Driver session
//!
//! The synchronous half of the scheduling driver: the `Idle → LeadIn →
//! Active → Idle` mode machine and everything it owns. No clocks or I/O
//! live here; the async [`Driver`](super::Driver) feeds it commands and
//! ticks and forwards each [`Step`] to the sinks.

use tracing::debug;
use uuid::Uuid;

use crate::config::{TabataConfig, Validator, WorkoutConfig};
use crate::cue::{Cue, CueDispatcher};
use crate::display::{Frame, Mode};
use crate::error::{ConfigError, DriverError, ValidationIssue};
use crate::phase::{
    Boundary, LeadIn, LeadInTick, Phase, PhaseEngine, PhaseTransition, WorkoutState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    LeadIn(LeadIn),
    Active,
}

/// What one command or tick produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Step {
    /// Cues to hand to the cue sink, in order.
    pub cues: Vec<Cue>,
    /// The phase engine advanced by one second.
    pub ticked: bool,
    /// The lead-in finished and the first Work phase began.
    pub began: bool,
    /// Boundary crossed by the engine, if any.
    pub transition: Option<PhaseTransition>,
}

impl Step {
    /// Phase entered during this step, if any.
    #[must_use]
    pub fn entered(&self) -> Option<Phase> {
        if self.began {
            return Some(Phase::Work);
        }
        match self.transition?.to {
            Boundary::Entered(phase) => Some(phase),
            Boundary::Completed => None,
        }
    }

    /// Whether the workout completed during this step.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.transition.is_some_and(|t| t.is_completion())
    }
}

/// One timer session: configuration, engine, cue dispatcher, and mode.
#[derive(Debug, Clone)]
pub struct Session {
    config: TabataConfig,
    engine: PhaseEngine,
    dispatcher: CueDispatcher,
    stage: Stage,
    run_id: Option<Uuid>,
}

impl Session {
    /// Creates an idle session. `config` is expected to be validated.
    #[must_use]
    pub fn new(config: TabataConfig) -> Self {
        let engine = PhaseEngine::new(config.workout.intervals());
        let dispatcher = CueDispatcher::new(config.cues);
        Self {
            config,
            engine,
            dispatcher,
            stage: Stage::Idle,
            run_id: None,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &TabataConfig {
        &self.config
    }

    /// Current workout state.
    #[must_use]
    pub const fn state(&self) -> WorkoutState {
        self.engine.state()
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self.stage {
            Stage::Idle => Mode::Idle,
            Stage::LeadIn(_) => Mode::LeadIn,
            Stage::Active => Mode::Active,
        }
    }

    /// Identifier of the current run, if one was started.
    #[must_use]
    pub const fn run_id(&self) -> Option<Uuid> {
        self.run_id
    }

    /// Whether the clock should be delivering ticks.
    #[must_use]
    pub const fn wants_ticks(&self) -> bool {
        match self.stage {
            Stage::Idle => false,
            Stage::LeadIn(_) => true,
            Stage::Active => self.engine.state().is_advancing(),
        }
    }

    /// Snapshot for display sinks.
    #[must_use]
    pub fn frame(&self) -> Frame {
        let lead_in = match self.stage {
            Stage::LeadIn(l) => Some(l.remaining()),
            Stage::Idle | Stage::Active => None,
        };
        Frame::build(self.mode(), lead_in, &self.config.workout, &self.engine.state())
    }

    /// Starts the lead-in from Idle.
    ///
    /// A finished workout is reset first, so Start after completion runs
    /// the same workout again.
    ///
    /// # Errors
    ///
    /// `InvalidCommand` when not idle; `StartRefused` when the exercise
    /// sequence is explicitly empty. The state is untouched either way.
    pub fn start(&mut self) -> Result<Step, DriverError> {
        if self.stage != Stage::Idle {
            return Err(DriverError::InvalidCommand(
                "workout already started".to_string(),
            ));
        }
        if self
            .config
            .workout
            .exercises
            .as_ref()
            .is_some_and(Vec::is_empty)
        {
            return Err(DriverError::StartRefused(
                "exercise list is empty".to_string(),
            ));
        }

        self.engine.reset();
        self.dispatcher.reset();
        self.run_id = Some(Uuid::new_v4());

        let (lead_in, cue) = LeadIn::start(self.config.lead_in);
        self.stage = Stage::LeadIn(lead_in);
        Ok(Step {
            cues: vec![cue],
            ..Step::default()
        })
    }

    /// Pauses an active run. Returns `true` if the state changed.
    ///
    /// The lead-in cannot be paused.
    pub fn pause(&mut self) -> bool {
        match self.stage {
            Stage::Active if self.engine.state().is_advancing() => {
                self.engine.pause();
                true
            }
            Stage::LeadIn(_) => {
                debug!("pause ignored during lead-in");
                false
            }
            Stage::Idle | Stage::Active => false,
        }
    }

    /// Resumes a paused run. Returns `true` if the state changed.
    pub fn resume(&mut self) -> bool {
        let state = self.engine.state();
        if self.stage == Stage::Active && state.paused && !state.complete {
            self.engine.resume();
            true
        } else {
            false
        }
    }

    /// Pauses a running workout or resumes a paused one.
    pub fn toggle_pause(&mut self) -> bool {
        if self.engine.state().paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Returns to Idle from any mode, discarding the lead-in and the
    /// current run. Returns the id of the run that was discarded.
    pub fn reset(&mut self) -> Option<Uuid> {
        self.stage = Stage::Idle;
        self.engine.reset();
        self.dispatcher.reset();
        self.run_id.take()
    }

    /// Replaces the workout configuration and resets.
    ///
    /// Returns the validation warnings on success.
    ///
    /// # Errors
    ///
    /// `ConfigError::ValidationError` if the new workout is invalid; the
    /// session is left exactly as it was.
    pub fn reconfigure(
        &mut self,
        workout: WorkoutConfig,
    ) -> Result<Vec<ValidationIssue>, ConfigError> {
        let result = Validator::new().validate_workout(&workout);
        if result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: "<reconfigure>".to_string(),
                errors: result.errors,
            });
        }

        self.engine = PhaseEngine::new(workout.intervals());
        self.config.workout = workout;
        self.reset();
        Ok(result.warnings)
    }

    /// Delivers one clock tick.
    pub fn tick(&mut self) -> Step {
        match self.stage {
            Stage::Idle => Step::default(),
            Stage::LeadIn(lead_in) => match lead_in.tick() {
                LeadInTick::Counting(next, cue) => {
                    self.stage = Stage::LeadIn(next);
                    Step {
                        cues: vec![cue],
                        ..Step::default()
                    }
                }
                LeadInTick::Done => {
                    self.engine.begin();
                    self.stage = Stage::Active;
                    Step {
                        cues: self.dispatcher.on_start().into_iter().collect(),
                        began: true,
                        ..Step::default()
                    }
                }
            },
            Stage::Active => {
                if !self.engine.state().is_advancing() {
                    return Step::default();
                }
                let transition = self.engine.tick();
                let cue = match &transition {
                    Some(t) => {
                        if t.is_completion() {
                            self.stage = Stage::Idle;
                        }
                        self.dispatcher.on_transition(t)
                    }
                    None => self.dispatcher.on_countdown(&self.engine.state()),
                };
                Step {
                    cues: cue.into_iter().collect(),
                    ticked: true,
                    began: false,
                    transition,
                }
            }
        }
    }
}
