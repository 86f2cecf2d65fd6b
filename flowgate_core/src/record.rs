//! Typed telemetry rows and the widget-default derivation.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Widget defaults used when the feed carries no rows.
pub const FALLBACK_CLIENT_ID: &str = "esp32-client-1";
pub const FALLBACK_INTERVAL: i64 = 10_000;
pub const FALLBACK_TARIFF: i64 = 10_000;

/// One normalized row of the telemetry feed. Immutable once parsed; the full
/// set is replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub timestamp: NaiveDateTime,
    /// Flow-sensor reading for the reporting interval.
    pub flow: f64,
    /// Cost per unit of flow.
    pub tariff: f64,
    pub client_id: String,
    /// Device reporting interval.
    pub interval: i64,
    /// Derived: `flow * tariff`.
    pub total_cost: f64,
    /// Derived: month bucket of the timestamp, `YYYY-MM`.
    pub month: String,
    /// Derived: calendar date of the timestamp, no time component.
    pub day: NaiveDate,
}

/// Default values for the client-id/interval/tariff inputs.
///
/// Always derived from the most recent cached row, never from the last sent
/// command, so these can diverge from device-applied parameters when the
/// device does not echo state back into the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamDefaults {
    pub client_id: String,
    pub interval: i64,
    pub tariff: i64,
}

impl ParamDefaults {
    pub fn fallback() -> Self {
        Self {
            client_id: FALLBACK_CLIENT_ID.to_string(),
            interval: FALLBACK_INTERVAL,
            tariff: FALLBACK_TARIFF,
        }
    }

    /// Defaults from the most recent row, or `fallback` when `rows` is empty.
    /// The tariff cell is truncated to an integer, matching the numeric input.
    pub fn from_latest_or(rows: &[TelemetryRecord], fallback: &Self) -> Self {
        match rows.last() {
            Some(row) => Self {
                client_id: row.client_id.clone(),
                interval: row.interval,
                tariff: row.tariff as i64,
            },
            None => fallback.clone(),
        }
    }

    pub fn from_latest(rows: &[TelemetryRecord]) -> Self {
        Self::from_latest_or(rows, &Self::fallback())
    }
}
