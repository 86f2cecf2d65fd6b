#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core dashboard logic (network-agnostic).
//!
//! This crate provides the transport-independent monitoring and control
//! engine. All I/O goes through `flowgate_traits::FeedTransport` and
//! `flowgate_traits::Publisher` traits.
//!
//! ## Architecture
//!
//! - **Records**: typed telemetry rows with derived cost/grouping columns
//!   (`record`, `feed` modules)
//! - **Refresh**: per-session refresh gate and TTL-bounded feed cache
//!   (`gate`, `cache`, `session` modules)
//! - **Control**: edge-triggered valve/parameter dispatch (`command` module)
//! - **Loop**: tick-plus-events dashboard runner (`runner` module)
//!
//! Time is injected through `flowgate_traits::Clock` so gate and cache expiry
//! are deterministic under test.

pub mod cache;
pub mod command;
pub mod conversions;
pub mod error;
pub mod feed;
pub mod gate;
pub mod mocks;
pub mod record;
pub mod runner;
pub mod session;

pub use cache::FeedCache;
pub use command::{CommandDispatcher, Topics, ValveState, params_payload};
pub use conversions::SessionCfg;
pub use error::{FeedError, PublishError};
pub use feed::{FEED_HEADERS, FEED_TIME_FORMAT, FeedLoader, parse_feed};
pub use gate::RefreshGate;
pub use record::{
    FALLBACK_CLIENT_ID, FALLBACK_INTERVAL, FALLBACK_TARIFF, ParamDefaults, TelemetryRecord,
};
pub use runner::{ControlEvent, Dashboard, Snapshot};
pub use session::SessionContext;
