//! Local-file feed retrieval, for offline use and tests.

use flowgate_traits::FeedTransport;

pub struct FileFeed;

impl FeedTransport for FileFeed {
    fn fetch(
        &mut self,
        locator: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        tracing::debug!(path = locator, "reading feed file");
        std::fs::read_to_string(locator)
            .map_err(|e| format!("read feed file {locator}: {e}").into())
    }
}
