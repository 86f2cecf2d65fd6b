//! Mappings from `flowgate_config` schema types to core types.

use crate::command::Topics;
use crate::record::ParamDefaults;
use std::time::Duration;

/// Timing knobs for a session context.
#[derive(Debug, Clone, Copy)]
pub struct SessionCfg {
    pub refresh_interval: Duration,
    pub cache_ttl: Duration,
}

impl From<&flowgate_config::FeedCfg> for SessionCfg {
    fn from(cfg: &flowgate_config::FeedCfg) -> Self {
        Self {
            refresh_interval: Duration::from_secs(cfg.refresh_secs),
            cache_ttl: Duration::from_secs(cfg.cache_ttl_secs),
        }
    }
}

impl From<&flowgate_config::BrokerCfg> for Topics {
    fn from(cfg: &flowgate_config::BrokerCfg) -> Self {
        Self {
            control: cfg.control_topic.clone(),
            params: cfg.params_topic.clone(),
        }
    }
}

impl From<&flowgate_config::FallbackCfg> for ParamDefaults {
    fn from(cfg: &flowgate_config::FallbackCfg) -> Self {
        Self {
            client_id: cfg.client_id.clone(),
            interval: cfg.interval,
            tariff: cfg.tariff,
        }
    }
}
