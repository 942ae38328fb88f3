//! Workout state representation
//!
//! Plain `Copy` values: the engine takes a state and returns the next one,
//! so the driver never holds an alias into state it is about to replace.

use serde::Serialize;

use crate::cue::Cue;

/// The activity segment the workout is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Work interval.
    Work,
    /// Rest between rounds.
    Rest,
    /// Longer rest between two circuits.
    BetweenCircuitsRest,
}

impl Phase {
    /// Label used in logs, metrics, and the terminal display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Rest => "rest",
            Self::BetweenCircuitsRest => "circuit_rest",
        }
    }

    /// Returns `true` for `Work`.
    #[must_use]
    pub const fn is_work(self) -> bool {
        matches!(self, Self::Work)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Work => "WORK",
            Self::Rest => "REST",
            Self::BetweenCircuitsRest => "CIRCUIT REST",
        };
        f.write_str(text)
    }
}

/// Interval lengths and counts the engine runs on.
///
/// Built from a validated `WorkoutConfig`: every field is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Intervals {
    /// Work seconds.
    pub work: u32,
    /// Rest seconds.
    pub rest: u32,
    /// Rounds per circuit.
    pub rounds: u32,
    /// Number of circuits.
    pub circuits: u32,
    /// Seconds of rest between circuits.
    pub between_circuits_rest: u32,
}

impl Intervals {
    /// Configured length of a phase in seconds.
    #[must_use]
    pub const fn length_of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work,
            Phase::Rest => self.rest,
            Phase::BetweenCircuitsRest => self.between_circuits_rest,
        }
    }
}

/// Authoritative state of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkoutState {
    /// Current phase.
    pub phase: Phase,
    /// Seconds left before the next boundary.
    pub remaining_seconds: u32,
    /// 1-based round within the circuit; 0 before the first Work phase.
    pub round: u32,
    /// 1-based circuit.
    pub circuit: u32,
    /// Whether the driver should advance this state.
    pub running: bool,
    /// Paused runs keep their counters and resume where they stopped.
    pub paused: bool,
    /// Terminal flag, set exactly once per run.
    pub complete: bool,
}

impl WorkoutState {
    /// State after a reset (or before the first start).
    #[must_use]
    pub const fn reset(intervals: &Intervals) -> Self {
        Self {
            phase: Phase::Work,
            remaining_seconds: intervals.work,
            round: 0,
            circuit: 1,
            running: false,
            paused: false,
            complete: false,
        }
    }

    /// State at the hand-off from the lead-in: first Work phase, running.
    #[must_use]
    pub const fn begin(intervals: &Intervals) -> Self {
        Self {
            phase: Phase::Work,
            remaining_seconds: intervals.work,
            round: 1,
            circuit: 1,
            running: true,
            paused: false,
            complete: false,
        }
    }

    /// Returns a paused copy. Counters are untouched.
    #[must_use]
    pub const fn paused(self) -> Self {
        Self {
            paused: true,
            ..self
        }
    }

    /// Returns a resumed copy.
    #[must_use]
    pub const fn resumed(self) -> Self {
        Self {
            paused: false,
            ..self
        }
    }

    /// Whether the scheduling driver should deliver ticks to this state.
    #[must_use]
    pub const fn is_advancing(&self) -> bool {
        self.running && !self.paused && !self.complete
    }
}

/// Where a boundary crossing led.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "phase", rename_all = "snake_case")]
pub enum Boundary {
    /// A new phase was entered.
    Entered(Phase),
    /// The final Work phase ended; the run is over.
    Completed,
}

/// Record of a boundary crossing for the cue dispatcher and observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseTransition {
    /// Phase that just ended.
    pub from: Phase,
    /// What followed it.
    pub to: Boundary,
    /// Round counter after the transition.
    pub round: u32,
    /// Circuit counter after the transition.
    pub circuit: u32,
    /// Cue associated with this boundary.
    pub cue: Cue,
}

impl PhaseTransition {
    /// Whether this transition enters a Work phase.
    #[must_use]
    pub const fn enters_work(&self) -> bool {
        matches!(self.to, Boundary::Entered(Phase::Work))
    }

    /// Whether this transition ends the run.
    #[must_use]
    pub const fn is_completion(&self) -> bool {
        matches!(self.to, Boundary::Completed)
    }
}

/// Outcome of one engine tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// State after the tick.
    pub state: WorkoutState,
    /// Boundary crossed during the tick, if any.
    pub transition: Option<PhaseTransition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intervals() -> Intervals {
        Intervals {
            work: 20,
            rest: 10,
            rounds: 8,
            circuits: 2,
            between_circuits_rest: 30,
        }
    }

    #[test]
    fn test_reset_state() {
        let state = WorkoutState::reset(&intervals());
        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.remaining_seconds, 20);
        assert_eq!(state.round, 0);
        assert_eq!(state.circuit, 1);
        assert!(!state.running);
        assert!(!state.is_advancing());
    }

    #[test]
    fn test_begin_state() {
        let state = WorkoutState::begin(&intervals());
        assert_eq!(state.round, 1);
        assert!(state.running);
        assert!(state.is_advancing());
    }

    #[test]
    fn test_pause_keeps_counters() {
        let state = WorkoutState {
            remaining_seconds: 7,
            round: 3,
            ..WorkoutState::begin(&intervals())
        };
        let paused = state.paused();
        assert!(!paused.is_advancing());
        assert_eq!(paused.remaining_seconds, 7);
        assert_eq!(paused.round, 3);
        assert_eq!(paused.resumed(), state);
    }

    #[test]
    fn test_length_of() {
        let i = intervals();
        assert_eq!(i.length_of(Phase::Work), 20);
        assert_eq!(i.length_of(Phase::Rest), 10);
        assert_eq!(i.length_of(Phase::BetweenCircuitsRest), 30);
    }

    #[test]
    fn test_phase_display_and_label() {
        assert_eq!(Phase::Work.to_string(), "WORK");
        assert_eq!(Phase::BetweenCircuitsRest.to_string(), "CIRCUIT REST");
        assert_eq!(Phase::Rest.label(), "rest");
        assert!(Phase::Work.is_work());
        assert!(!Phase::Rest.is_work());
    }
}
