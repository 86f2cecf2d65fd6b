//! Outbound control-message dispatch.

use crate::error::PublishError;
use flowgate_traits::Publisher;
use serde::Serialize;
use std::fmt;

/// Requested valve position, mapped to the literal wire payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValveState {
    On,
    Off,
}

impl ValveState {
    pub fn payload(self) -> &'static str {
        match self {
            ValveState::On => "ON",
            ValveState::Off => "OFF",
        }
    }
}

impl From<bool> for ValveState {
    fn from(open: bool) -> Self {
        if open { ValveState::On } else { ValveState::Off }
    }
}

impl fmt::Display for ValveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.payload())
    }
}

/// Fixed topic names for the two message variants.
#[derive(Debug, Clone)]
pub struct Topics {
    pub control: String,
    pub params: String,
}

/// The "interval,tariff" parameter payload, fixed order, single comma.
pub fn params_payload(interval: i64, tariff: i64) -> String {
    format!("{interval},{tariff}")
}

/// Translates control actions into single publishes on fixed topics.
///
/// The dispatcher tracks only the last valve state it successfully sent; it
/// has no view of device state and cannot distinguish "already ON at the
/// device" from "just turned ON".
pub struct CommandDispatcher<P: Publisher> {
    publisher: P,
    topics: Topics,
    last_valve: Option<ValveState>,
}

impl<P: Publisher> CommandDispatcher<P> {
    pub fn new(publisher: P, topics: Topics) -> Self {
        Self {
            publisher,
            topics,
            last_valve: None,
        }
    }

    /// One synchronous publish attempt. Success means the publish call
    /// returned without error; failures are returned typed, never panicked.
    pub fn send(&mut self, topic: &str, payload: &str) -> Result<(), PublishError> {
        tracing::debug!(topic, payload, "publish");
        self.publisher
            .publish(topic, payload)
            .map_err(|e| PublishError::Publish(e.to_string()))
    }

    /// Edge-triggered valve dispatch: publishes "ON"/"OFF" only when the
    /// requested state differs from the last successfully sent one. Returns
    /// whether a message went out.
    pub fn set_valve(&mut self, state: ValveState) -> Result<bool, PublishError> {
        if self.last_valve == Some(state) {
            tracing::debug!(state = %state, "valve unchanged; skipping publish");
            return Ok(false);
        }
        let topic = self.topics.control.clone();
        self.send(&topic, state.payload())?;
        self.last_valve = Some(state);
        Ok(true)
    }

    /// Parameter-pair dispatch, fired only on explicit user action.
    pub fn send_params(&mut self, interval: i64, tariff: i64) -> Result<(), PublishError> {
        let topic = self.topics.params.clone();
        let payload = params_payload(interval, tariff);
        self.send(&topic, &payload)
    }

    /// Last valve state this dispatcher successfully sent, if any.
    pub fn last_valve(&self) -> Option<ValveState> {
        self.last_valve
    }

    pub fn topics(&self) -> &Topics {
        &self.topics
    }
}
