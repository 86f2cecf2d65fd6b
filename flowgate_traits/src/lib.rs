pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// One-way outbound message publish to a named topic.
///
/// "Success" means the publish attempt itself completed; implementations may
/// strengthen that to a broker-level acknowledgement but never to a
/// device-level one.
pub trait Publisher {
    fn publish(
        &mut self,
        topic: &str,
        payload: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<P: Publisher + ?Sized> Publisher for Box<P> {
    fn publish(
        &mut self,
        topic: &str,
        payload: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).publish(topic, payload)
    }
}

/// Retrieval of a raw feed body for a source locator (URL or path).
pub trait FeedTransport {
    fn fetch(
        &mut self,
        locator: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: FeedTransport + ?Sized> FeedTransport for Box<T> {
    fn fetch(
        &mut self,
        locator: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        (**self).fetch(locator)
    }
}
