//! Configuration validation
//!
//! Bounds checks for workout configurations. Validation runs on the fully
//! deserialized `TabataConfig` and collects ALL issues (it doesn't stop at
//! the first) so a user fixing a file sees every problem at once.
//!
//! The phase engine never re-checks these bounds: anything that reaches it
//! has passed through here.

use crate::config::schema::{TabataConfig, WorkoutConfig};
use crate::error::{Severity, ValidationIssue};

/// Longest accepted work, rest, or between-circuit interval in seconds.
pub const MAX_INTERVAL_SECONDS: u32 = 300;
/// Most rounds accepted per circuit.
pub const MAX_ROUNDS: u32 = 100;
/// Most circuits accepted.
pub const MAX_CIRCUITS: u32 = 10;
/// Longest accepted lead-in countdown.
pub const MAX_LEAD_IN: u32 = 10;

// ============================================================================
// Public API
// ============================================================================

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a full configuration and returns the result.
    pub fn validate(&mut self, config: &TabataConfig) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.check_workout(&config.workout);
        self.check_range("lead_in", config.lead_in, 1, MAX_LEAD_IN);

        if !config.cues.any_enabled() {
            self.add_warning(
                "cues",
                "All cue rules are disabled; only lead-in beeps and the finish cue will sound",
            );
        }

        self.finish()
    }

    /// Validates only the workout section.
    ///
    /// Used when the driver receives a configuration change at runtime.
    pub fn validate_workout(&mut self, workout: &WorkoutConfig) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();
        self.check_workout(workout);
        self.finish()
    }

    fn finish(&mut self) -> ValidationResult {
        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Checks
    // ========================================================================

    fn check_workout(&mut self, workout: &WorkoutConfig) {
        self.check_range("workout.work", workout.work, 1, MAX_INTERVAL_SECONDS);
        self.check_range("workout.rest", workout.rest, 1, MAX_INTERVAL_SECONDS);
        self.check_range("workout.rounds", workout.rounds, 1, MAX_ROUNDS);
        self.check_range("workout.circuits", workout.circuits, 1, MAX_CIRCUITS);
        self.check_range(
            "workout.between_circuits_rest",
            workout.between_circuits_rest,
            1,
            MAX_INTERVAL_SECONDS,
        );

        if let Some(exercises) = &workout.exercises {
            if exercises.is_empty() {
                self.add_warning(
                    "workout.exercises",
                    "Exercise list is empty; starting this workout will be refused",
                );
            }
            for (i, name) in exercises.iter().enumerate() {
                if name.trim().is_empty() {
                    self.add_error(
                        &format!("workout.exercises[{i}]"),
                        "Exercise name cannot be empty",
                    );
                }
            }
            let rounds = usize::try_from(workout.rounds).unwrap_or(usize::MAX);
            if !exercises.is_empty() && exercises.len() != rounds {
                self.add_warning(
                    "workout.exercises",
                    &format!(
                        "{} exercises for {} rounds; the list will be cycled",
                        exercises.len(),
                        workout.rounds
                    ),
                );
            }
        }
    }

    fn check_range(&mut self, path: &str, value: u32, min: u32, max: u32) {
        if value < min {
            self.add_error(path, &format!("Must be at least {min} (got {value})"));
        } else if value > max {
            self.add_error(path, &format!("Must be at most {max} (got {value})"));
        }
    }

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
