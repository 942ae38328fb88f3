//! Countdown lead-in
//!
//! A short countdown that runs before the phase engine starts. It beeps
//! when it starts and on every decrement; the tick that finds it at 1
//! reports [`LeadInTick::Done`] and the driver hands off to the engine.

use crate::cue::Cue;

/// Lead-in counter. Discarded once it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadIn {
    remaining: u32,
}

/// Result of one lead-in tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadInTick {
    /// Still counting; the new counter and the cue to request.
    Counting(LeadIn, Cue),
    /// Countdown finished; start the workout.
    Done,
}

impl LeadIn {
    /// Starts a countdown from `from` (at least 1) and returns the cue
    /// requested immediately.
    #[must_use]
    pub fn start(from: u32) -> (Self, Cue) {
        (
            Self {
                remaining: from.max(1),
            },
            Cue::CountdownBeep,
        )
    }

    /// The number currently shown.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Advances the countdown by one second.
    #[must_use]
    pub const fn tick(self) -> LeadInTick {
        if self.remaining <= 1 {
            LeadInTick::Done
        } else {
            LeadInTick::Counting(
                Self {
                    remaining: self.remaining - 1,
                },
                Cue::CountdownBeep,
            )
        }
    }
}
