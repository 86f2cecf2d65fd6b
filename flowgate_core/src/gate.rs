//! Periodic refresh gate.

use flowgate_traits::Clock;
use std::time::{Duration, Instant};

/// Compares elapsed time against a fixed interval and fires at most once per
/// qualifying elapse. Firing rearms the gate at the current instant.
#[derive(Debug)]
pub struct RefreshGate {
    interval: Duration,
    last: Instant,
}

impl RefreshGate {
    pub fn new<C: Clock>(interval: Duration, clock: &C) -> Self {
        Self {
            interval,
            last: clock.now(),
        }
    }

    /// True when the interval has strictly elapsed since the last firing.
    /// A `true` result overwrites the stored instant, so the immediately
    /// following poll reports `false`.
    pub fn poll<C: Clock>(&mut self, clock: &C) -> bool {
        let now = clock.now();
        if now.saturating_duration_since(self.last) > self.interval {
            self.last = now;
            return true;
        }
        false
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
