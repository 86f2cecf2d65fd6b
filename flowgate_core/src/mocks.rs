//! Test and helper mocks for flowgate_core

use flowgate_traits::{Clock, FeedTransport, Publisher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Deterministic clock whose time is advanced manually.
///
/// now() = origin + offset; sleep(d) advances internal time by d without
/// actually sleeping.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, d: Duration) {
        if let Ok(mut off) = self.offset.lock() {
            *off = off.saturating_add(d);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let off = self.offset.lock().map(|g| *g).unwrap_or(Duration::ZERO);
        self.origin + off
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

/// Publisher that records every (topic, payload) pair it is given.
#[derive(Default)]
pub struct RecordingPublisher {
    log: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the publish log; inspect after handing the publisher
    /// to a dispatcher.
    pub fn log_handle(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        self.log.clone()
    }
}

impl Publisher for RecordingPublisher {
    fn publish(
        &mut self,
        topic: &str,
        payload: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Ok(mut log) = self.log.lock() {
            log.push((topic.to_string(), payload.to_string()));
        }
        Ok(())
    }
}

/// Publisher that always fails with the given message.
pub struct FailingPublisher {
    message: String,
}

impl FailingPublisher {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Publisher for FailingPublisher {
    fn publish(
        &mut self,
        _topic: &str,
        _payload: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other(self.message.clone())))
    }
}

/// Transport serving a fixed body and counting fetches.
#[derive(Clone)]
pub struct StaticFeed {
    body: String,
    fetches: Arc<AtomicUsize>,
}

impl StaticFeed {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of fetches served so far; cache hits do not increment it.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn fetch_counter(&self) -> Arc<AtomicUsize> {
        self.fetches.clone()
    }
}

impl FeedTransport for StaticFeed {
    fn fetch(
        &mut self,
        _locator: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Ok(self.body.clone())
    }
}

/// Transport that always fails, for exercising the uncaught fetch path.
pub struct FailingFeed;

impl FeedTransport for FailingFeed {
    fn fetch(
        &mut self,
        locator: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other(format!(
            "unreachable feed: {locator}"
        ))))
    }
}
