#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Real transports behind the `flowgate_traits` seams: HTTP and file feed
//! retrieval, a single-shot MQTT publisher, and a dry-run publisher.

pub mod file;
pub mod http;
pub mod mqtt;
pub mod sim;

pub use file::FileFeed;
pub use http::HttpFeed;
pub use mqtt::MqttPublisher;
pub use sim::SimPublisher;

use flowgate_traits::FeedTransport;

/// Pick a transport for a locator: http(s) URLs go over HTTP, anything else
/// is treated as a local CSV path.
pub fn transport_for(locator: &str) -> Result<Box<dyn FeedTransport>, http::HttpError> {
    if locator.starts_with("http://") || locator.starts_with("https://") {
        Ok(Box::new(HttpFeed::new(std::time::Duration::from_secs(10))?))
    } else {
        Ok(Box::new(FileFeed))
    }
}
