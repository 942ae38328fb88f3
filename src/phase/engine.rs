//! Phase engine
//!
//! [`advance_one_second`] is the whole transition rule. It is a pure
//! function over `Copy` state; [`PhaseEngine`] just owns the current value
//! and applies it.
//!
//! The countdown is zero-inclusive: a phase of `n` seconds shows `n`, `n-1`,
//! ..., `0`, and the tick after `0` crosses the boundary. The crossing is
//! resolved inside the tick, so a negative remaining time is never observed.

use serde::Serialize;
use tracing::{info, trace};

use crate::cue::Cue;

use super::state::{Boundary, Intervals, Phase, PhaseTransition, Tick, WorkoutState};

/// Advances the state by one second.
///
/// A complete state is a fixed point: it is returned unchanged with no
/// transition. The caller decides whether the state should be ticked at
/// all (see [`WorkoutState::is_advancing`]).
#[must_use]
pub fn advance_one_second(intervals: &Intervals, state: WorkoutState) -> Tick {
    if state.complete {
        return Tick {
            state,
            transition: None,
        };
    }

    if let Some(remaining) = state.remaining_seconds.checked_sub(1) {
        return Tick {
            state: WorkoutState {
                remaining_seconds: remaining,
                ..state
            },
            transition: None,
        };
    }

    cross_boundary(intervals, state)
}

/// Resolves the tick that takes `remaining_seconds` below zero.
fn cross_boundary(intervals: &Intervals, state: WorkoutState) -> Tick {
    let from = state.phase;

    let (next, to, cue) = match from {
        Phase::BetweenCircuitsRest => (
            WorkoutState {
                phase: Phase::Work,
                remaining_seconds: intervals.work,
                round: 1,
                circuit: state.circuit + 1,
                ..state
            },
            Boundary::Entered(Phase::Work),
            Cue::FightBell,
        ),
        Phase::Work => {
            let round = state.round + 1;
            if round <= intervals.rounds {
                (
                    WorkoutState {
                        phase: Phase::Rest,
                        remaining_seconds: intervals.rest,
                        round,
                        ..state
                    },
                    Boundary::Entered(Phase::Rest),
                    Cue::Whistle,
                )
            } else if state.circuit >= intervals.circuits {
                // Terminal. Phase and remaining stay where they were so the
                // display freezes on the last Work second.
                (
                    WorkoutState {
                        round,
                        running: false,
                        complete: true,
                        ..state
                    },
                    Boundary::Completed,
                    Cue::Celebration,
                )
            } else {
                // `round` stays at rounds+1 until the next Work entry.
                (
                    WorkoutState {
                        phase: Phase::BetweenCircuitsRest,
                        remaining_seconds: intervals.between_circuits_rest,
                        round,
                        ..state
                    },
                    Boundary::Entered(Phase::BetweenCircuitsRest),
                    Cue::Buzzer,
                )
            }
        }
        Phase::Rest => (
            WorkoutState {
                phase: Phase::Work,
                remaining_seconds: intervals.work,
                ..state
            },
            Boundary::Entered(Phase::Work),
            Cue::FightBell,
        ),
    };

    Tick {
        state: next,
        transition: Some(PhaseTransition {
            from,
            to,
            round: next.round,
            circuit: next.circuit,
            cue,
        }),
    }
}

/// Owns the current state of one run and applies the transition rule.
#[derive(Debug, Clone)]
pub struct PhaseEngine {
    intervals: Intervals,
    state: WorkoutState,
}

impl PhaseEngine {
    /// Creates an engine in the reset state.
    #[must_use]
    pub const fn new(intervals: Intervals) -> Self {
        Self {
            intervals,
            state: WorkoutState::reset(&intervals),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> WorkoutState {
        self.state
    }

    /// Reinitialises to round 0, circuit 1, Work, not running.
    pub const fn reset(&mut self) {
        self.state = WorkoutState::reset(&self.intervals);
    }

    /// Enters the first Work phase (lead-in hand-off).
    pub const fn begin(&mut self) {
        self.state = WorkoutState::begin(&self.intervals);
    }

    /// Marks the run paused.
    pub const fn pause(&mut self) {
        self.state = self.state.paused();
    }

    /// Clears the paused flag.
    pub const fn resume(&mut self) {
        self.state = self.state.resumed();
    }

    /// Applies one tick and returns the boundary crossed, if any.
    pub fn tick(&mut self) -> Option<PhaseTransition> {
        let Tick { state, transition } = advance_one_second(&self.intervals, self.state);
        self.state = state;

        if let Some(t) = &transition {
            info!(
                from = t.from.label(),
                to = ?t.to,
                round = t.round,
                circuit = t.circuit,
                "phase transition"
            );
        } else {
            trace!(
                phase = state.phase.label(),
                remaining = state.remaining_seconds,
                "tick"
            );
        }

        transition
    }
}

/// One entry of the phase schedule of a workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Phase of this segment.
    pub phase: Phase,
    /// Round counter while the segment runs.
    pub round: u32,
    /// Circuit counter while the segment runs.
    pub circuit: u32,
    /// Configured length in seconds.
    pub seconds: u32,
}

/// Lists every phase the engine will enter for these intervals, in order.
///
/// Built by running the transition rule itself from the lead-in hand-off
/// to completion, so it cannot drift from what a live run does.
#[must_use]
pub fn schedule(intervals: &Intervals) -> Vec<Segment> {
    let mut state = WorkoutState::begin(intervals);
    let mut segments = vec![segment_of(intervals, &state)];

    while !state.complete {
        let tick = advance_one_second(intervals, state);
        state = tick.state;
        if matches!(
            tick.transition,
            Some(PhaseTransition {
                to: Boundary::Entered(_),
                ..
            })
        ) {
            segments.push(segment_of(intervals, &state));
        }
    }

    segments
}

const fn segment_of(intervals: &Intervals, state: &WorkoutState) -> Segment {
    Segment {
        phase: state.phase,
        round: state.round,
        circuit: state.circuit,
        seconds: intervals.length_of(state.phase),
    }
}
