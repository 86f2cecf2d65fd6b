//! TTL-bounded single-slot cache for loader output.

use crate::record::TelemetryRecord;
use flowgate_traits::Clock;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct CacheEntry {
    locator: String,
    rows: Vec<TelemetryRecord>,
    stored_at: Instant,
}

/// Result cache keyed by source locator. An entry stays fresh through the
/// time-to-live; the refresh gate may clear it earlier — whichever expires
/// first wins. Replacement is wholesale, never an incremental merge.
#[derive(Debug)]
pub struct FeedCache {
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl FeedCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// True when a live entry for `locator` is present.
    pub fn fresh<C: Clock>(&self, locator: &str, clock: &C) -> bool {
        match &self.entry {
            Some(e) => e.locator == locator && clock.elapsed_since(e.stored_at) <= self.ttl,
            None => false,
        }
    }

    /// Cached rows regardless of freshness; `fresh()` decides reuse.
    pub fn rows(&self) -> Option<&[TelemetryRecord]> {
        self.entry.as_ref().map(|e| e.rows.as_slice())
    }

    pub fn put<C: Clock>(&mut self, locator: impl Into<String>, rows: Vec<TelemetryRecord>, clock: &C) {
        self.entry = Some(CacheEntry {
            locator: locator.into(),
            rows,
            stored_at: clock.now(),
        });
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
