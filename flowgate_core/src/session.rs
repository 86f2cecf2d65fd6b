//! Explicitly scoped per-session state.
//!
//! The session context owns the refresh gate, the feed cache, and the widget
//! fallback values. It is constructed per session and passed explicitly; no
//! ambient/global storage, so one session's refresh never invalidates
//! another's cache.

use crate::cache::FeedCache;
use crate::conversions::SessionCfg;
use crate::error::Result;
use crate::feed::FeedLoader;
use crate::gate::RefreshGate;
use crate::record::{ParamDefaults, TelemetryRecord};
use flowgate_traits::{Clock, FeedTransport};

pub struct SessionContext<C: Clock> {
    clock: C,
    gate: RefreshGate,
    cache: FeedCache,
    fallback: ParamDefaults,
}

impl<C: Clock> SessionContext<C> {
    pub fn new(clock: C, cfg: SessionCfg, fallback: ParamDefaults) -> Self {
        let gate = RefreshGate::new(cfg.refresh_interval, &clock);
        let cache = FeedCache::new(cfg.cache_ttl);
        Self {
            clock,
            gate,
            cache,
            fallback,
        }
    }

    /// Gated access to the feed rows.
    ///
    /// Polls the refresh gate (clearing the cache when due), serves cached
    /// rows while the TTL holds, and otherwise fetches and parses a fresh
    /// set. Fetch/parse failures propagate; the stale cache slot is left
    /// cleared so the next call retries.
    pub fn rows<T: FeedTransport>(
        &mut self,
        loader: &mut FeedLoader<T>,
    ) -> Result<&[TelemetryRecord]> {
        if self.gate.poll(&self.clock) {
            tracing::debug!(source = loader.source(), "refresh interval elapsed; cache cleared");
            self.cache.clear();
        }
        if !self.cache.fresh(loader.source(), &self.clock) {
            self.cache.clear();
            let rows = loader.load()?;
            tracing::info!(source = loader.source(), rows = rows.len(), "feed refreshed");
            self.cache.put(loader.source().to_string(), rows, &self.clock);
        }
        Ok(self.cache.rows().unwrap_or(&[]))
    }

    /// Input-widget defaults from the most recent cached row, or the
    /// configured fallback when nothing is cached.
    pub fn defaults(&self) -> ParamDefaults {
        ParamDefaults::from_latest_or(self.cache.rows().unwrap_or(&[]), &self.fallback)
    }

    /// Number of currently cached rows (zero when nothing is cached).
    pub fn cached_len(&self) -> usize {
        self.cache.rows().map_or(0, |rows| rows.len())
    }

    /// Drop any cached rows; the next `rows()` call fetches anew.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
