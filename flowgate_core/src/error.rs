use thiserror::Error;

/// Failures while fetching or normalizing the telemetry feed.
///
/// These propagate uncaught through the loading path; a failed fetch is
/// retried only by the next tick or user action.
#[derive(Debug, Error, Clone)]
pub enum FeedError {
    #[error("feed transport error: {0}")]
    Transport(String),
    #[error("feed must have headers '{expected}', got: {got}")]
    Header { expected: String, got: String },
    #[error("invalid feed row {row}: {reason}")]
    Row { row: usize, reason: String },
    #[error("invalid timestamp in feed row {row}: {value:?} (expected {format})")]
    Timestamp {
        row: usize,
        value: String,
        format: &'static str,
    },
}

/// Failures while publishing a control message.
///
/// Contained at every call site; a publish error is reported to the status
/// path and never escapes a handler.
#[derive(Debug, Error, Clone)]
pub enum PublishError {
    #[error("broker connect failed: {0}")]
    Connect(String),
    #[error("publish failed: {0}")]
    Publish(String),
    #[error("no broker acknowledgement within {0} ms")]
    AckTimeout(u64),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
