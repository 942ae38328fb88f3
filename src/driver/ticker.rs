//! Owned 1 Hz clock
//!
//! A [`Ticker`] exists only while the session wants ticks. Stopping the
//! clock means giving the value up: [`Ticker::cancel`] consumes it and
//! dropping it does the same, so no exit path can leave a clock running.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::trace;

/// Default clock period.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);
/// Shortest accepted period; shorter ones are raised to it.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A running clock.
#[derive(Debug)]
pub struct Ticker {
    interval: Interval,
    period: Duration,
}

impl Ticker {
    /// Starts a clock whose first tick is one full `period` away.
    ///
    /// Restarting after a pause therefore never delivers a tick early.
    /// A period below [`MIN_PERIOD`] is raised to it.
    #[must_use]
    pub fn start(period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        trace!(?period, "ticker started");
        Self { interval, period }
    }

    /// Clock period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Waits for the next tick.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }

    /// Stops the clock.
    pub fn cancel(self) {
        trace!("ticker cancelled");
    }
}
