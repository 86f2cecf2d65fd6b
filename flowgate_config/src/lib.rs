#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and validation for the flow-monitoring dashboard.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Every section is optional; defaults reproduce the fixed constants of the
//!   hosted deployment (public broker, published-spreadsheet feed).
use serde::Deserialize;

/// Published-spreadsheet CSV used when no feed url is configured.
pub const DEFAULT_FEED_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQde6k9bpztDrdIY93vx12iJqtxs_CRH7tGVXeZ-qcUQogmlYRgSr4vRUxGqMJswjLXzNXsYg9dL9TF/pub?output=csv";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedCfg {
    /// Source locator: http(s) URL or a local CSV path.
    pub url: String,
    /// Refresh gate interval in seconds; cached rows are dropped once this elapses.
    pub refresh_secs: u64,
    /// Loader cache time-to-live in seconds, independent of the gate interval.
    pub cache_ttl_secs: u64,
}

impl Default for FeedCfg {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            refresh_secs: 10,
            cache_ttl_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BrokerCfg {
    pub host: String,
    pub port: u16,
    /// Client identifier presented to the broker by this dashboard.
    pub client_id: String,
    /// Topic carrying valve state ("ON"/"OFF").
    pub control_topic: String,
    /// Topic carrying the "interval,tariff" parameter pair.
    pub params_topic: String,
    /// Upper bound on one publish round-trip, including the broker ack.
    pub publish_timeout_ms: u64,
}

impl Default for BrokerCfg {
    fn default() -> Self {
        Self {
            host: "broker.hivemq.com".to_string(),
            port: 1883,
            client_id: "flowgate-dash".to_string(),
            control_topic: "smartwater/control".to_string(),
            params_topic: "smartwater/params".to_string(),
            publish_timeout_ms: 5000,
        }
    }
}

/// Widget defaults used when the feed is empty.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FallbackCfg {
    pub client_id: String,
    pub interval: i64,
    pub tariff: i64,
}

impl Default for FallbackCfg {
    fn default() -> Self {
        Self {
            client_id: "esp32-client-1".to_string(),
            interval: 10_000,
            tariff: 10_000,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub feed: FeedCfg,
    pub broker: BrokerCfg,
    pub fallback: FallbackCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Feed
        if self.feed.url.trim().is_empty() {
            eyre::bail!("feed.url must not be empty");
        }
        if self.feed.refresh_secs == 0 {
            eyre::bail!("feed.refresh_secs must be >= 1");
        }
        if self.feed.cache_ttl_secs == 0 {
            eyre::bail!("feed.cache_ttl_secs must be >= 1");
        }

        // Broker
        if self.broker.host.trim().is_empty() {
            eyre::bail!("broker.host must not be empty");
        }
        if self.broker.port == 0 {
            eyre::bail!("broker.port must be > 0");
        }
        if self.broker.client_id.trim().is_empty() {
            eyre::bail!("broker.client_id must not be empty");
        }
        if self.broker.control_topic.trim().is_empty() {
            eyre::bail!("broker.control_topic must not be empty");
        }
        if self.broker.params_topic.trim().is_empty() {
            eyre::bail!("broker.params_topic must not be empty");
        }
        if self.broker.control_topic == self.broker.params_topic {
            eyre::bail!("broker.control_topic and broker.params_topic must differ");
        }
        if self.broker.publish_timeout_ms == 0 {
            eyre::bail!("broker.publish_timeout_ms must be >= 1");
        }
        if self.broker.publish_timeout_ms > 60_000 {
            eyre::bail!("broker.publish_timeout_ms is unreasonably large (>60s)");
        }

        // Fallback
        if self.fallback.client_id.trim().is_empty() {
            eyre::bail!("fallback.client_id must not be empty");
        }
        if self.fallback.interval <= 0 {
            eyre::bail!("fallback.interval must be > 0");
        }
        if self.fallback.tariff < 0 {
            eyre::bail!("fallback.tariff must be >= 0");
        }

        // Logging
        if let Some(rotation) = &self.logging.rotation
            && !matches!(rotation.as_str(), "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
