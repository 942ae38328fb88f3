//! `tabata` - interval workout countdown timer
//!
//! A pure phase engine (work, rest, rest between circuits) driven by a
//! 1 Hz scheduling driver, with pluggable display and cue sinks.

pub mod cli;
pub mod config;
pub mod cue;
pub mod display;
pub mod driver;
pub mod duration;
pub mod error;
pub mod observability;
pub mod phase;
