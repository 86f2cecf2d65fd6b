//! Human-readable error descriptions and structured JSON error formatting.

use flowgate_core::{FeedError, PublishError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(fe) = err.downcast_ref::<FeedError>() {
        return match fe {
            FeedError::Transport(msg) => format!(
                "What happened: The telemetry feed could not be fetched ({msg}).\nLikely causes: Network down, wrong feed.url, or the published sheet is unavailable.\nHow to fix: Check feed.url in the config and connectivity, then re-run."
            ),
            FeedError::Header { expected, got } => format!(
                "What happened: The feed header row drifted (got: {got}).\nLikely causes: Columns were renamed or reordered in the published sheet.\nHow to fix: Restore the exact header row '{expected}' (order matters)."
            ),
            FeedError::Row { row, reason } => format!(
                "What happened: Feed row {row} could not be parsed ({reason}).\nLikely causes: A non-numeric flow/tariff/interval cell or a truncated row.\nHow to fix: Fix or remove the offending row in the sheet, then re-run."
            ),
            FeedError::Timestamp { row, value, format } => format!(
                "What happened: Feed row {row} carries an unparseable timestamp {value:?}.\nLikely causes: The Date column is not in the {format} format.\nHow to fix: Keep the sheet's Date column in the {format} format."
            ),
        };
    }

    if let Some(pe) = err.downcast_ref::<PublishError>() {
        return match pe {
            PublishError::Connect(msg) => format!(
                "What happened: Could not reach the broker ({msg}).\nLikely causes: Broker down, wrong broker.host/port, or a firewall in between.\nHow to fix: Check broker.host and broker.port in the config, then re-run."
            ),
            PublishError::Publish(msg) => format!(
                "What happened: The control message was not published ({msg}).\nLikely causes: Broker unreachable or the connection dropped mid-publish.\nHow to fix: Check broker settings and connectivity; the command is safe to re-run."
            ),
            PublishError::AckTimeout(ms) => format!(
                "What happened: The broker did not acknowledge the publish within {ms} ms.\nLikely causes: Slow or overloaded broker, or packet loss.\nHow to fix: Raise broker.publish_timeout_ms or check the broker, then re-run."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("must have headers") {
        return "Invalid feed headers. Expected 'Date,Flow Sensor,Client ID,Interval,Tariff'."
            .to_string();
    }

    if lower.contains("connection refused") || lower.contains("connection failed") {
        return "What happened: The broker refused the connection.\nLikely causes: Wrong broker.host/port or the broker is down.\nHow to fix: Fix the [broker] section in the config and re-run.".to_string();
    }

    if lower.contains("read config file") || lower.contains("parse config file") {
        return format!(
            "What happened: The config file could not be loaded.\nLikely causes: Wrong --config path or invalid TOML.\nHow to fix: Fix the path or the TOML and re-run. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes per error class: feed errors 3, publish errors 4,
/// everything else 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<FeedError>().is_some() {
        return 3;
    }
    if err.downcast_ref::<PublishError>().is_some() {
        return 4;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let reason = if err.downcast_ref::<FeedError>().is_some() {
        "Feed"
    } else if err.downcast_ref::<PublishError>().is_some() {
        "Publish"
    } else {
        "Error"
    };
    json!({ "reason": reason, "message": humanize(err) }).to_string()
}
