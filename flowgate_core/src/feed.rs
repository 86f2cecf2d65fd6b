//! Feed retrieval and normalization.
//!
//! The feed is a headered CSV; the loader enforces the exact header row and
//! derives the total-cost and month/day grouping columns during parse. Any
//! header drift, unparseable timestamp, or non-numeric cell is an
//! unrecoverable loader error.

use crate::error::{FeedError, Result};
use crate::record::TelemetryRecord;
use eyre::WrapErr;
use flowgate_traits::FeedTransport;
use serde::Deserialize;

/// Fixed timestamp format of the feed's `Date` column.
pub const FEED_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Expected header row, order-sensitive.
pub const FEED_HEADERS: [&str; 5] = ["Date", "Flow Sensor", "Client ID", "Interval", "Tariff"];

/// Feed CSV schema before normalization.
///
/// Example:
/// Date,Flow Sensor,Client ID,Interval,Tariff
/// 09/03/2024 12:30:00,2.5,esp32-client-1,10000,10000
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Flow Sensor")]
    flow: f64,
    #[serde(rename = "Client ID")]
    client_id: String,
    #[serde(rename = "Interval")]
    interval: i64,
    #[serde(rename = "Tariff")]
    tariff: f64,
}

/// Parse a raw CSV body into normalized records.
pub fn parse_feed(body: &str) -> Result<Vec<TelemetryRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body.as_bytes());

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| FeedError::Header {
            expected: FEED_HEADERS.join(","),
            got: e.to_string(),
        })?
        .clone();
    let actual: Vec<&str> = headers.iter().collect();
    if actual != FEED_HEADERS {
        return Err(FeedError::Header {
            expected: FEED_HEADERS.join(","),
            got: actual.join(","),
        }
        .into());
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<RawRow>().enumerate() {
        // Header is line 1; data starts at line 2.
        let line = idx + 2;
        let raw = rec.map_err(|e| FeedError::Row {
            row: line,
            reason: e.to_string(),
        })?;
        rows.push(normalize(raw, line)?);
    }
    Ok(rows)
}

fn normalize(raw: RawRow, line: usize) -> Result<TelemetryRecord> {
    let timestamp = chrono::NaiveDateTime::parse_from_str(&raw.date, FEED_TIME_FORMAT).map_err(
        |_| FeedError::Timestamp {
            row: line,
            value: raw.date.clone(),
            format: FEED_TIME_FORMAT,
        },
    )?;
    Ok(TelemetryRecord {
        timestamp,
        flow: raw.flow,
        tariff: raw.tariff,
        client_id: raw.client_id,
        interval: raw.interval,
        total_cost: raw.flow * raw.tariff,
        month: timestamp.format("%Y-%m").to_string(),
        day: timestamp.date(),
    })
}

/// Fetch-and-parse front end over a `FeedTransport`.
pub struct FeedLoader<T: FeedTransport> {
    transport: T,
    locator: String,
}

impl<T: FeedTransport> FeedLoader<T> {
    pub fn new(transport: T, locator: impl Into<String>) -> Self {
        Self {
            transport,
            locator: locator.into(),
        }
    }

    /// The source locator this loader (and its cache slot) is keyed by.
    pub fn source(&self) -> &str {
        &self.locator
    }

    /// One fetch + parse round. No retry; the caller re-triggers on the next
    /// tick or user action.
    pub fn load(&mut self) -> Result<Vec<TelemetryRecord>> {
        let body = self
            .transport
            .fetch(&self.locator)
            .map_err(|e| FeedError::Transport(e.to_string()))?;
        parse_feed(&body).wrap_err_with(|| format!("load feed from {}", self.locator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = "\
Date,Flow Sensor,Client ID,Interval,Tariff
09/03/2024 12:30:00,2.5,esp32-client-1,10000,2000
09/03/2024 12:30:10,3.0,esp32-client-1,10000,2000
";

    #[test]
    fn derives_cost_month_and_day() {
        let rows = parse_feed(GOOD).expect("parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].total_cost, 2.5 * 2000.0);
        assert_eq!(rows[0].month, "2024-03");
        assert_eq!(rows[0].day.to_string(), "2024-03-09");
        assert_eq!(rows[1].interval, 10_000);
    }

    #[test]
    fn rejects_header_drift() {
        let body = "Date,Flow,Client ID,Interval,Tariff\n09/03/2024 12:30:00,2.5,x,1,1\n";
        let err = parse_feed(body).expect_err("header drift must fail");
        assert!(format!("{err}").contains("must have headers"));
    }

    #[test]
    fn rejects_unparseable_timestamp() {
        let body = "Date,Flow Sensor,Client ID,Interval,Tariff\n2024-03-09 12:30:00,2.5,x,1,1\n";
        let err = parse_feed(body).expect_err("ISO timestamp must fail");
        assert!(format!("{err}").contains("invalid timestamp in feed row 2"));
    }

    #[test]
    fn rejects_non_numeric_flow() {
        let body = "Date,Flow Sensor,Client ID,Interval,Tariff\n09/03/2024 12:30:00,n/a,x,1,1\n";
        let err = parse_feed(body).expect_err("non-numeric flow must fail");
        assert!(format!("{err}").contains("invalid feed row 2"));
    }

    #[test]
    fn headers_only_is_an_empty_feed_not_an_error() {
        let rows = parse_feed("Date,Flow Sensor,Client ID,Interval,Tariff\n").expect("parse");
        assert!(rows.is_empty());
    }
}
