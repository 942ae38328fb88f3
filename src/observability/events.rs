//! Structured event stream for `tabata`.
//!
//! Discrete, typed events emitted while a workout runs. Events are written
//! as newline-delimited JSON (JSONL), each with a monotonically increasing
//! sequence number. `WorkoutCompleted` is the record other programs use as
//! workout history.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::cue::Cue;
use crate::phase::Phase;

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Why a run loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The workout ran to completion.
    Completed,
    /// The user quit.
    Quit,
    /// Cancelled by a signal.
    Cancelled,
    /// The command source closed.
    InputClosed,
}

/// What a finished workout looked like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutRecord {
    /// Work seconds per round.
    pub work_seconds: u32,
    /// Rest seconds per round.
    pub rest_seconds: u32,
    /// Rounds per circuit.
    pub rounds: u32,
    /// Circuits completed.
    pub circuits: u32,
    /// Configured total length in seconds.
    pub total_seconds: u64,
}

// ---------------------------------------------------------------------------
// Event enum
// ---------------------------------------------------------------------------

/// A structured workout event.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Start accepted; the lead-in is running.
    WorkoutStarted {
        /// When the start was accepted.
        timestamp: DateTime<Utc>,
        /// Identifier shared by every event of this run.
        run_id: Uuid,
        /// Lead-in start value.
        lead_in: u32,
    },

    /// A phase was entered.
    PhaseEntered {
        /// When the phase was entered.
        timestamp: DateTime<Utc>,
        /// Run identifier.
        run_id: Uuid,
        /// Phase entered.
        phase: Phase,
        /// Round counter on entry.
        round: u32,
        /// Circuit counter on entry.
        circuit: u32,
    },

    /// A cue was requested from the cue sink.
    CueRequested {
        /// When the cue was requested.
        timestamp: DateTime<Utc>,
        /// Run identifier.
        run_id: Uuid,
        /// The cue.
        cue: Cue,
    },

    /// The workout was paused.
    WorkoutPaused {
        /// When the pause took effect.
        timestamp: DateTime<Utc>,
        /// Run identifier.
        run_id: Uuid,
        /// Seconds left in the phase.
        remaining_seconds: u32,
    },

    /// The workout was resumed.
    WorkoutResumed {
        /// When the resume took effect.
        timestamp: DateTime<Utc>,
        /// Run identifier.
        run_id: Uuid,
        /// Seconds left in the phase.
        remaining_seconds: u32,
    },

    /// The workout was reset to idle.
    WorkoutReset {
        /// When the reset happened.
        timestamp: DateTime<Utc>,
        /// Run identifier, absent if nothing was running.
        #[serde(skip_serializing_if = "Option::is_none")]
        run_id: Option<Uuid>,
    },

    /// The workout ran to completion.
    WorkoutCompleted {
        /// When the final Work phase ended.
        timestamp: DateTime<Utc>,
        /// Run identifier.
        run_id: Uuid,
        /// What was completed.
        workout: WorkoutRecord,
    },

    /// The run loop stopped.
    RunStopped {
        /// When the loop stopped.
        timestamp: DateTime<Utc>,
        /// Why it stopped.
        reason: StopReason,
    },
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    sequence: u64,
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Serialization or I/O failures are dropped; a broken event file never
/// stops the timer.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use super::*;

    #[derive(Clone)]
    struct TestWriter(Arc<StdMutex<Vec<u8>>>);

    impl TestWriter {
        fn new() -> Self {
            Self(Arc::new(StdMutex::new(Vec::new())))
        }

        fn contents(&self) -> String {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn entered(phase: Phase) -> Event {
        Event::PhaseEntered {
            timestamp: DateTime::parse_from_rfc3339("2026-03-01T07:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            run_id: Uuid::nil(),
            phase,
            round: 2,
            circuit: 1,
        }
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let json = serde_json::to_string(&entered(Phase::Rest)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["type"], "PhaseEntered");
        assert_eq!(parsed["phase"], "rest");
        assert_eq!(parsed["round"], 2);
    }

    #[test]
    fn emitter_writes_sequenced_jsonl() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(entered(Phase::Work));
        emitter.emit(Event::RunStopped {
            timestamp: Utc::now(),
            reason: StopReason::Quit,
        });

        assert_eq!(emitter.event_count(), 2);
        let lines: Vec<serde_json::Value> = tw
            .contents()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0]["sequence"], 0);
        assert_eq!(lines[0]["type"], "PhaseEntered");
        assert_eq!(lines[1]["sequence"], 1);
        assert_eq!(lines[1]["reason"], "quit");
    }

    #[test]
    fn reset_without_run_omits_run_id() {
        let json = serde_json::to_string(&Event::WorkoutReset {
            timestamp: Utc::now(),
            run_id: None,
        })
        .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.get("run_id").is_none());
    }

    #[test]
    fn completed_carries_workout_record() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(Event::WorkoutCompleted {
            timestamp: Utc::now(),
            run_id: Uuid::new_v4(),
            workout: WorkoutRecord {
                work_seconds: 20,
                rest_seconds: 10,
                rounds: 8,
                circuits: 1,
                total_seconds: 450,
            },
        });
        let parsed: serde_json::Value = serde_json::from_str(tw.contents().trim()).unwrap();
        assert_eq!(parsed["workout"]["total_seconds"], 450);
    }

    #[test]
    fn noop_emitter_counts() {
        let emitter = EventEmitter::noop();
        emitter.emit(entered(Phase::Work));
        assert_eq!(emitter.event_count(), 1);
    }
}
