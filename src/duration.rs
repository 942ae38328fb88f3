//! Duration calculator
//!
//! Informational arithmetic over a workout configuration. Nothing here
//! feeds back into the engine.

use serde::Serialize;

use crate::phase::{Intervals, WorkoutState};

/// Total workout length in seconds.
///
/// `circuits * (rounds * (work + rest) + (rounds - 1) * between_circuits_rest)`
#[must_use]
pub fn total_seconds(intervals: &Intervals) -> u64 {
    let work = u64::from(intervals.work);
    let rest = u64::from(intervals.rest);
    let rounds = u64::from(intervals.rounds);
    let circuits = u64::from(intervals.circuits);
    let between = u64::from(intervals.between_circuits_rest);

    circuits * (rounds * (work + rest) + rounds.saturating_sub(1) * between)
}

/// Formats a total as `m:ss` (minutes unpadded).
#[must_use]
pub fn format_total(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Formats a countdown as `MM:SS`.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Fraction of the current phase that has elapsed, in `0.0..=1.0`.
///
/// A phase whose configured length is zero counts as fully elapsed.
#[must_use]
pub fn phase_progress(intervals: &Intervals, state: &WorkoutState) -> f64 {
    let total = intervals.length_of(state.phase);
    if total == 0 {
        return 1.0;
    }
    let elapsed = total.saturating_sub(state.remaining_seconds);
    (f64::from(elapsed) / f64::from(total)).clamp(0.0, 1.0)
}

/// Workout summary shown before a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutSummary {
    /// Total length in seconds.
    pub total_seconds: u64,
    /// Total length as `m:ss`.
    pub total: String,
    /// Work ("time on") seconds.
    pub work_seconds: u32,
    /// Rest ("time off") seconds.
    pub rest_seconds: u32,
    /// Seconds of rest between circuits.
    pub between_circuits_rest_seconds: u32,
    /// Rounds per circuit.
    pub rounds: u32,
    /// Number of circuits.
    pub circuits: u32,
}

impl WorkoutSummary {
    /// Computes the summary for these intervals.
    #[must_use]
    pub fn of(intervals: &Intervals) -> Self {
        let total_seconds = total_seconds(intervals);
        Self {
            total_seconds,
            total: format_total(total_seconds),
            work_seconds: intervals.work,
            rest_seconds: intervals.rest,
            between_circuits_rest_seconds: intervals.between_circuits_rest,
            rounds: intervals.rounds,
            circuits: intervals.circuits,
        }
    }
}

impl std::fmt::Display for WorkoutSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total Workout Time: {}", self.total)?;
        write!(
            f,
            "Time On: {} seconds | Time Off: {} seconds | Between Circuits: {} seconds",
            self.work_seconds, self.rest_seconds, self.between_circuits_rest_seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;

    fn intervals(work: u32, rest: u32, rounds: u32, circuits: u32, between: u32) -> Intervals {
        Intervals {
            work,
            rest,
            rounds,
            circuits,
            between_circuits_rest: between,
        }
    }

    #[test]
    fn test_classic_tabata() {
        // 8 * 30 + 7 * 30: the between-circuit term applies per round gap
        // even in a single circuit.
        let i = intervals(20, 10, 8, 1, 30);
        assert_eq!(total_seconds(&i), 450);
        assert_eq!(format_total(total_seconds(&i)), "7:30");
    }

    #[test]
    fn test_multi_circuit() {
        // 3 * (5 * 60 + 4 * 15) = 3 * 360
        let i = intervals(40, 20, 5, 3, 15);
        assert_eq!(total_seconds(&i), 1080);
        assert_eq!(format_total(1080), "18:00");
    }

    #[test]
    fn test_single_round_has_no_between_term() {
        let i = intervals(30, 30, 1, 2, 300);
        assert_eq!(total_seconds(&i), 120);
    }

    #[test]
    fn test_format_total_pads_seconds_only() {
        assert_eq!(format_total(0), "0:00");
        assert_eq!(format_total(65), "1:05");
        assert_eq!(format_total(3600), "60:00");
    }

    #[test]
    fn test_format_clock_pads_both() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(9), "00:09");
        assert_eq!(format_clock(125), "02:05");
    }

    #[test]
    fn test_phase_progress() {
        let i = intervals(20, 10, 8, 1, 30);
        let mut state = WorkoutState::begin(&i);
        assert!((phase_progress(&i, &state) - 0.0).abs() < f64::EPSILON);

        state.remaining_seconds = 5;
        assert!((phase_progress(&i, &state) - 0.75).abs() < f64::EPSILON);

        state.phase = Phase::Rest;
        assert!((phase_progress(&i, &state) - 0.5).abs() < f64::EPSILON);

        state.remaining_seconds = 0;
        assert!((phase_progress(&i, &state) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_length_phase_is_complete() {
        let i = intervals(20, 0, 8, 1, 30);
        let state = WorkoutState {
            phase: Phase::Rest,
            remaining_seconds: 0,
            ..WorkoutState::begin(&i)
        };
        assert!((phase_progress(&i, &state) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_display() {
        let summary = WorkoutSummary::of(&intervals(20, 10, 8, 1, 30));
        let text = summary.to_string();
        assert!(text.contains("Total Workout Time: 7:30"));
        assert!(text.contains("Time On: 20 seconds"));
        assert!(text.contains("Between Circuits: 30 seconds"));
    }
}
