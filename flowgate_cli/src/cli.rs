//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Config path probed when --config is not given.
pub const DEFAULT_CONFIG_PATH: &str = "etc/flowgate.toml";

#[derive(Parser, Debug)]
#[command(name = "flowgate", version, about = "Water-flow dashboard CLI")]
pub struct Cli {
    /// Path to config TOML; falls back to built-in defaults when the default
    /// path is absent
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log (and print) as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Valve position requested on the command line.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ValveArg {
    On,
    Off,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the dashboard loop: timer-driven feed refresh until Ctrl-C
    Run {
        /// Override the refresh interval from the config
        #[arg(long, value_name = "SECS")]
        refresh_secs: Option<u64>,
        /// Stop after this many refresh ticks (runs until Ctrl-C when unset)
        #[arg(long, value_name = "N")]
        iterations: Option<u64>,
        /// Log publishes instead of contacting the broker
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
    },
    /// One gated feed load; prints the latest rows and widget defaults
    Fetch {
        /// Print at most this many of the latest rows
        #[arg(long, value_name = "N", default_value_t = 10)]
        limit: usize,
    },
    /// Send a valve command to the control topic
    Valve {
        /// Requested valve state
        #[arg(value_enum)]
        state: ValveArg,
        /// Log the publish instead of contacting the broker
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
    },
    /// Send the "interval,tariff" pair to the params topic
    SendParams {
        /// Device reporting interval
        #[arg(long)]
        interval: i64,
        /// Cost per unit of flow
        #[arg(long)]
        tariff: i64,
        /// Log the publish instead of contacting the broker
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
    },
    /// Config + feed sanity check without publishing
    SelfCheck,
}
