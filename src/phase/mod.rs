//! Phase engine
//!
//! The workout state machine: Work, Rest, and BetweenCircuitsRest phases
//! driven one second at a time, plus the lead-in countdown that precedes
//! them.
//!
//! # Architecture
//!
//! - [`WorkoutState`] — `Copy` state of one run (phase, counters, flags)
//! - [`advance_one_second`] — pure transition rule
//! - [`PhaseEngine`] — owner of the current state
//! - [`LeadIn`] — pre-start countdown

pub mod engine;
pub mod lead_in;
pub mod state;

pub use engine::{PhaseEngine, Segment, advance_one_second, schedule};
pub use lead_in::{LeadIn, LeadInTick};
pub use state::{Boundary, Intervals, Phase, PhaseTransition, Tick, WorkoutState};
