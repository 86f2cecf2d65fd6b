//! Dry-run publisher: logs what would have been sent and reports success.

use flowgate_traits::Publisher;

#[derive(Debug, Default)]
pub struct SimPublisher {
    published: usize,
}

impl SimPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages accepted so far.
    pub fn published(&self) -> usize {
        self.published
    }
}

impl Publisher for SimPublisher {
    fn publish(
        &mut self,
        topic: &str,
        payload: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.published += 1;
        tracing::info!(topic, payload, "dry-run publish (nothing sent)");
        Ok(())
    }
}
