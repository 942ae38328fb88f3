//! `plan` command handler
//!
//! Prints the workout summary and the phase schedule without running it.

use std::fmt::Write as _;

use serde::Serialize;

use crate::cli::args::{OutputFormat, PlanArgs};
use crate::config::TabataConfig;
use crate::duration::{WorkoutSummary, format_clock};
use crate::error::TabataError;
use crate::phase::{Phase, Segment, schedule};

use super::resolve_settings;

/// Machine-readable plan.
#[derive(Debug, Serialize)]
struct PlanOutput<'a> {
    summary: WorkoutSummary,
    lead_in: u32,
    segments: Vec<PlannedSegment<'a>>,
}

#[derive(Debug, Serialize)]
struct PlannedSegment<'a> {
    #[serde(flatten)]
    segment: Segment,
    #[serde(skip_serializing_if = "Option::is_none")]
    exercise: Option<&'a str>,
}

/// Print the plan for the configured workout.
///
/// # Errors
///
/// Returns a config error for invalid settings, or a JSON error if the
/// plan cannot be serialized.
pub fn run(args: &PlanArgs) -> Result<(), TabataError> {
    let config = resolve_settings(&args.settings)?;
    let output = build(&config);

    match args.format {
        OutputFormat::Human => print!("{}", render_human(&config, &output)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
    }
    Ok(())
}

fn build(config: &TabataConfig) -> PlanOutput<'_> {
    let intervals = config.workout.intervals();
    let segments = schedule(&intervals)
        .into_iter()
        .map(|segment| {
            let round = match segment.phase {
                Phase::BetweenCircuitsRest => 1,
                Phase::Work | Phase::Rest => segment.round,
            };
            PlannedSegment {
                exercise: config.workout.exercise_for_round(round),
                segment,
            }
        })
        .collect();

    PlanOutput {
        summary: WorkoutSummary::of(&intervals),
        lead_in: config.lead_in,
        segments,
    }
}

fn render_human(config: &TabataConfig, plan: &PlanOutput<'_>) -> String {
    let rounds = config.workout.rounds;
    let circuits = config.workout.circuits;
    let mut out = format!("{}\n\n", plan.summary);
    let _ = writeln!(out, "Lead-in: {}s", plan.lead_in);
    let _ = writeln!(out, "{:>4}  {:<8} {:<8} {:<13} {}", "#", "circuit", "round", "phase", "length");

    for (i, planned) in plan.segments.iter().enumerate() {
        let s = &planned.segment;
        let round = if s.phase == Phase::BetweenCircuitsRest {
            "-".to_string()
        } else {
            format!("{}/{rounds}", s.round)
        };
        let _ = write!(
            out,
            "{:>4}  {:<8} {:<8} {:<13} {}",
            i + 1,
            format!("{}/{circuits}", s.circuit),
            round,
            s.phase.to_string(),
            format_clock(s.seconds),
        );
        if let Some(exercise) = planned.exercise {
            let prefix = if s.phase.is_work() { "" } else { "next: " };
            let _ = write!(out, "  {prefix}{exercise}");
        }
        out.push('\n');
    }
    out
}
