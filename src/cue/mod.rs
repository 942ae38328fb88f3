//! Audible cues
//!
//! The core only decides *when* a cue is requested and *which* one; how a
//! [`Cue`] is turned into sound is up to the [`CueSink`] implementation.

pub mod dispatcher;
pub mod sink;

use serde::{Deserialize, Serialize};

pub use dispatcher::{CueDispatcher, FINAL_STRETCH_SECONDS};
pub use sink::{BellSink, CueSink, LogCueSink};

/// Symbolic cue identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Entering a Work phase.
    FightBell,
    /// Entering a Rest phase.
    Whistle,
    /// Entering the rest between circuits.
    Buzzer,
    /// Lead-in count and final-stretch warning.
    CountdownBeep,
    /// Workout finished.
    Celebration,
}

impl Cue {
    /// Stable name used in logs, events, and metrics labels.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FightBell => "fight_bell",
            Self::Whistle => "whistle",
            Self::Buzzer => "buzzer",
            Self::CountdownBeep => "countdown_beep",
            Self::Celebration => "celebration",
        }
    }
}

impl std::fmt::Display for Cue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// User-configurable rules deciding which transitions sound a cue.
///
/// The toggles are independent; a cue fires if any enabled rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CueRule {
    /// Cue before every Work phase (a new round).
    pub before_work: bool,
    /// Cue before every Rest phase.
    pub before_rest: bool,
    /// Cue only when the workout starts.
    pub only_at_start: bool,
    /// Cue on every transition.
    pub all_transitions: bool,
}

impl Default for CueRule {
    fn default() -> Self {
        Self {
            before_work: false,
            before_rest: false,
            only_at_start: false,
            all_transitions: true,
        }
    }
}

impl CueRule {
    /// Returns `true` if at least one rule is enabled.
    #[must_use]
    pub const fn any_enabled(&self) -> bool {
        self.before_work || self.before_rest || self.only_at_start || self.all_transitions
    }
}

/// The facts about a transition that cue rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueEvent {
    /// The transition enters a Work phase.
    pub is_work: bool,
    /// The transition is the start of the workout.
    pub is_start: bool,
}

/// Decides whether a gated cue fires for a transition.
#[must_use]
pub const fn should_fire(rule: &CueRule, event: CueEvent) -> bool {
    if rule.all_transitions {
        return true;
    }
    if rule.only_at_start && event.is_start {
        return true;
    }
    if rule.before_work && event.is_work {
        return true;
    }
    rule.before_rest && !event.is_work
}
