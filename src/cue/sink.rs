//! Cue sinks
//!
//! Receivers of cue requests. Requests are fire-and-forget: a sink that
//! fails to sound a cue must not disturb the timer.

use std::io::Write;

use tracing::info;

use super::Cue;

/// Receives cue requests from the driver.
pub trait CueSink: Send {
    /// Requests that `cue` be played now.
    fn play(&mut self, cue: Cue);
}

/// Rings the terminal bell.
///
/// Cues that mark a bigger moment ring more than once so they can be told
/// apart by ear.
pub struct BellSink {
    writer: Box<dyn Write + Send>,
}

impl BellSink {
    /// Creates a sink writing BEL characters to `writer`.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self { writer }
    }

    /// Creates a sink ringing the bell on stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Number of bells rung for a cue.
    #[must_use]
    pub const fn rings(cue: Cue) -> usize {
        match cue {
            Cue::CountdownBeep | Cue::Whistle => 1,
            Cue::FightBell | Cue::Buzzer => 2,
            Cue::Celebration => 3,
        }
    }
}

impl std::fmt::Debug for BellSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BellSink").finish_non_exhaustive()
    }
}

impl CueSink for BellSink {
    fn play(&mut self, cue: Cue) {
        let bells = "\x07".repeat(Self::rings(cue));
        let _ = self.writer.write_all(bells.as_bytes());
        let _ = self.writer.flush();
    }
}

/// Logs cue requests instead of sounding them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCueSink;

impl CueSink for LogCueSink {
    fn play(&mut self, cue: Cue) {
        info!(cue = cue.name(), "cue");
    }
}
