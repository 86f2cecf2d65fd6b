//! Tick-plus-events dashboard loop.
//!
//! Replaces the original whole-script-per-render model: a timer drives the
//! gated feed refresh, and each control event maps to exactly one dispatcher
//! call, so a refresh can never re-send a valve command. The loop is
//! single-threaded and synchronous; the one blocking call with visible
//! latency is the outbound publish.

use crate::command::{CommandDispatcher, ValveState, params_payload};
use crate::error::Result;
use crate::feed::FeedLoader;
use crate::record::ParamDefaults;
use crate::session::SessionContext;
use crossbeam_channel::{Receiver, select, tick};
use flowgate_traits::{Clock, FeedTransport, Publisher};
use serde::Serialize;
use std::time::Duration;

/// One user/control action delivered to the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Valve(ValveState),
    SendParams { interval: i64, tariff: i64 },
    Shutdown,
}

/// What an observer sees after each render: row count, widget defaults,
/// last sent valve state, and the status line for the action (if any).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub rows: usize,
    pub defaults: ParamDefaults,
    pub valve: Option<ValveState>,
    pub feed_ok: bool,
    pub status: Option<String>,
}

pub struct Dashboard<C: Clock, T: FeedTransport, P: Publisher> {
    session: SessionContext<C>,
    loader: FeedLoader<T>,
    dispatcher: CommandDispatcher<P>,
}

impl<C: Clock, T: FeedTransport, P: Publisher> Dashboard<C, T, P> {
    pub fn new(
        session: SessionContext<C>,
        loader: FeedLoader<T>,
        dispatcher: CommandDispatcher<P>,
    ) -> Self {
        Self {
            session,
            loader,
            dispatcher,
        }
    }

    /// Run until `Shutdown`, sender disconnect, or `max_ticks` refresh ticks.
    ///
    /// Every render (the initial one, each tick, each handled event) is
    /// reported through `on_update`. Feed and publish failures are contained
    /// into the snapshot's status; they never abort the loop.
    pub fn run(
        &mut self,
        events: &Receiver<ControlEvent>,
        tick_every: Duration,
        max_ticks: Option<u64>,
        on_update: &mut dyn FnMut(&Snapshot),
    ) -> Result<()> {
        let ticker = tick(tick_every);
        let mut ticks: u64 = 0;

        on_update(&self.refresh());
        if max_ticks == Some(0) {
            return Ok(());
        }

        loop {
            select! {
                recv(ticker) -> _ => {
                    on_update(&self.refresh());
                    ticks += 1;
                    if let Some(max) = max_ticks
                        && ticks >= max
                    {
                        tracing::debug!(ticks, "tick limit reached; leaving loop");
                        break;
                    }
                }
                recv(events) -> msg => {
                    match msg {
                        Ok(ControlEvent::Shutdown) | Err(_) => {
                            tracing::info!("dashboard loop shutting down");
                            break;
                        }
                        Ok(ev) => on_update(&self.handle(ev)),
                    }
                }
            }
        }
        Ok(())
    }

    /// Gated feed refresh; failures land in the snapshot, not the caller.
    fn refresh(&mut self) -> Snapshot {
        let (rows, feed_ok, status) = match self.session.rows(&mut self.loader) {
            Ok(rows) => (rows.len(), true, None),
            Err(e) => {
                tracing::error!(error = %e, "feed refresh failed");
                (0, false, Some(format!("feed refresh failed: {e:#}")))
            }
        };
        Snapshot {
            rows,
            defaults: self.session.defaults(),
            valve: self.dispatcher.last_valve(),
            feed_ok,
            status,
        }
    }

    /// One control event, one dispatcher call. Publish errors are contained.
    fn handle(&mut self, ev: ControlEvent) -> Snapshot {
        let status = match ev {
            ControlEvent::Valve(state) => match self.dispatcher.set_valve(state) {
                Ok(true) => format!("Valve: {state}"),
                Ok(false) => format!("Valve: {state} (unchanged)"),
                Err(e) => {
                    tracing::error!(error = %e, state = %state, "valve publish failed");
                    format!("valve publish failed: {e}")
                }
            },
            ControlEvent::SendParams { interval, tariff } => {
                match self.dispatcher.send_params(interval, tariff) {
                    Ok(()) => format!("Parameters sent: {}", params_payload(interval, tariff)),
                    Err(e) => {
                        tracing::error!(error = %e, "parameter publish failed");
                        format!("parameter publish failed: {e}")
                    }
                }
            }
            // Shutdown is consumed by `run`
            ControlEvent::Shutdown => String::new(),
        };
        Snapshot {
            rows: self.session.cached_len(),
            defaults: self.session.defaults(),
            valve: self.dispatcher.last_valve(),
            feed_ok: true,
            status: Some(status),
        }
    }
}
