//! Metrics collection for `tabata`.
//!
//! Prometheus-compatible counters and gauges for a running workout. The
//! recording functions are no-ops until [`init_metrics`] installs a
//! recorder, so the driver calls them unconditionally.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::cue::Cue;
use crate::error::TabataError;
use crate::phase::{Boundary, PhaseTransition};

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without an
/// HTTP endpoint.
///
/// # Errors
///
/// Returns `TabataError::Io` if the recorder or HTTP listener cannot be
/// installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), TabataError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| TabataError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

fn describe_metrics() {
    describe_counter!("tabata_ticks_total", "Engine ticks delivered");
    describe_counter!(
        "tabata_phase_transitions_total",
        "Phase boundaries crossed, by phase entered"
    );
    describe_counter!("tabata_cues_total", "Cues requested, by cue");
    describe_counter!(
        "tabata_workouts_completed_total",
        "Workouts run to completion"
    );
    describe_gauge!(
        "tabata_remaining_seconds",
        "Seconds left in the current phase"
    );
    describe_gauge!("tabata_paused", "1 while the workout is paused");
}

/// Records one engine tick.
pub fn record_tick(remaining_seconds: u32) {
    counter!("tabata_ticks_total").increment(1);
    gauge!("tabata_remaining_seconds").set(f64::from(remaining_seconds));
}

/// Records a boundary crossing. Completion is counted separately.
pub fn record_transition(transition: &PhaseTransition) {
    match transition.to {
        Boundary::Entered(phase) => {
            counter!("tabata_phase_transitions_total", "phase" => phase.label()).increment(1);
        }
        Boundary::Completed => {
            counter!("tabata_workouts_completed_total").increment(1);
        }
    }
}

/// Records a cue request.
pub fn record_cue(cue: Cue) {
    counter!("tabata_cues_total", "cue" => cue.name()).increment(1);
}

/// Sets the paused gauge.
pub fn set_paused(paused: bool) {
    gauge!("tabata_paused").set(if paused { 1.0 } else { 0.0 });
}
