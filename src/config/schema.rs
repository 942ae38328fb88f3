//! Configuration schema types
//!
//! Serde types for workout files. Durations are whole seconds and may be
//! written either as integers (`20`) or as human-readable strings (`20s`,
//! `1m30s`).

use serde::{Deserialize, Serialize};

use crate::cue::CueRule;
use crate::error::ConfigError;
use crate::phase::Intervals;

/// Default work interval in seconds.
pub const DEFAULT_WORK_SECONDS: u32 = 20;
/// Default rest interval in seconds.
pub const DEFAULT_REST_SECONDS: u32 = 10;
/// Default rounds per circuit.
pub const DEFAULT_ROUNDS: u32 = 8;
/// Default number of circuits.
pub const DEFAULT_CIRCUITS: u32 = 1;
/// Default rest between circuits in seconds.
pub const DEFAULT_BETWEEN_CIRCUITS_REST_SECONDS: u32 = 30;
/// Default lead-in countdown start value.
pub const DEFAULT_LEAD_IN: u32 = 3;

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration for a timer run.
///
/// Every field has a default, so an empty document is a valid
/// (classic 20/10 x 8) workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TabataConfig {
    /// Interval lengths and counts.
    #[serde(default)]
    pub workout: WorkoutConfig,

    /// Lead-in countdown start value.
    #[serde(default = "default_lead_in")]
    pub lead_in: u32,

    /// Which phase transitions request an audible cue.
    #[serde(default)]
    pub cues: CueRule,
}

impl Default for TabataConfig {
    fn default() -> Self {
        Self {
            workout: WorkoutConfig::default(),
            lead_in: DEFAULT_LEAD_IN,
            cues: CueRule::default(),
        }
    }
}

const fn default_lead_in() -> u32 {
    DEFAULT_LEAD_IN
}

// ============================================================================
// Workout
// ============================================================================

/// Workout configuration.
///
/// Immutable for the duration of a run; any change forces a reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkoutConfig {
    /// Work interval length.
    #[serde(with = "seconds", default = "default_work")]
    pub work: u32,

    /// Rest interval length.
    #[serde(with = "seconds", default = "default_rest")]
    pub rest: u32,

    /// Rounds per circuit.
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    /// Number of circuits.
    #[serde(default = "default_circuits")]
    pub circuits: u32,

    /// Rest between circuits (only used when `circuits > 1`).
    #[serde(with = "seconds", default = "default_between_circuits_rest")]
    pub between_circuits_rest: u32,

    /// Optional named exercise sequence, cycled one per round.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercises: Option<Vec<String>>,
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            work: DEFAULT_WORK_SECONDS,
            rest: DEFAULT_REST_SECONDS,
            rounds: DEFAULT_ROUNDS,
            circuits: DEFAULT_CIRCUITS,
            between_circuits_rest: DEFAULT_BETWEEN_CIRCUITS_REST_SECONDS,
            exercises: None,
        }
    }
}

impl WorkoutConfig {
    /// Returns the interval parameters the phase engine runs on.
    #[must_use]
    pub const fn intervals(&self) -> Intervals {
        Intervals {
            work: self.work,
            rest: self.rest,
            rounds: self.rounds,
            circuits: self.circuits,
            between_circuits_rest: self.between_circuits_rest,
        }
    }

    /// Returns the exercise scheduled for the given 1-based round, if an
    /// exercise sequence is configured.
    ///
    /// The sequence wraps when there are more rounds than exercises.
    #[must_use]
    pub fn exercise_for_round(&self, round: u32) -> Option<&str> {
        let list = self.exercises.as_ref()?;
        if list.is_empty() || round == 0 {
            return None;
        }
        let idx = usize::try_from(round - 1).ok()? % list.len();
        list.get(idx).map(String::as_str)
    }
}

const fn default_work() -> u32 {
    DEFAULT_WORK_SECONDS
}

const fn default_rest() -> u32 {
    DEFAULT_REST_SECONDS
}

const fn default_rounds() -> u32 {
    DEFAULT_ROUNDS
}

const fn default_circuits() -> u32 {
    DEFAULT_CIRCUITS
}

const fn default_between_circuits_rest() -> u32 {
    DEFAULT_BETWEEN_CIRCUITS_REST_SECONDS
}

// ============================================================================
// Duration fields
// ============================================================================

/// Parses a whole-second duration such as `"45"`, `"45s"` or `"1m30s"`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if the string is not a duration,
/// has a sub-second component, or does not fit in `u32` seconds.
pub fn parse_seconds(s: &str) -> Result<u32, ConfigError> {
    let trimmed = s.trim();
    let invalid = |expected: &str| ConfigError::InvalidValue {
        field: "duration".to_string(),
        value: s.to_string(),
        expected: expected.to_string(),
    };

    if let Ok(n) = trimmed.parse::<u32>() {
        return Ok(n);
    }

    let duration = humantime::parse_duration(trimmed)
        .map_err(|_| invalid("a duration like '20', '20s' or '1m30s'"))?;
    if duration.subsec_nanos() != 0 {
        return Err(invalid("whole seconds"));
    }
    u32::try_from(duration.as_secs()).map_err(|_| invalid("a shorter duration"))
}

/// Serde adapter for whole-second duration fields.
mod seconds {
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    #[allow(clippy::trivially_copy_pass_by_ref)] // serde `with` signature
    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => u32::try_from(n)
                .map_err(|_| de::Error::custom(format!("duration out of range: {n}"))),
            Raw::Text(s) => super::parse_seconds(&s).map_err(de::Error::custom),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
