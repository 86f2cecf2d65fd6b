//! Single-shot MQTT publishing.
//!
//! Each publish opens its own connection, sends one QoS 1 message, waits a
//! bounded time for the broker's PubAck, and disconnects. Success therefore
//! means broker-confirmed receipt, not device-applied state; there is no
//! subscription and no response channel.

use flowgate_traits::Publisher;
use rumqttc::{Client, Event, Incoming, MqttOptions, Outgoing, QoS};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum MqttError {
    #[error("broker connection failed: {0}")]
    Connection(String),
    #[error("publish to '{topic}' failed: {reason}")]
    Publish { topic: String, reason: String },
    #[error("no broker acknowledgement within {0} ms")]
    AckTimeout(u64),
}

pub struct MqttPublisher {
    host: String,
    port: u16,
    client_id: String,
    timeout: Duration,
}

impl MqttPublisher {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        client_id: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            client_id: client_id.into(),
            timeout,
        }
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    fn publish_single(&self, topic: &str, payload: &str) -> Result<(), MqttError> {
        let mut opts = MqttOptions::new(&self.client_id, &self.host, self.port);
        opts.set_keep_alive(Duration::from_secs(5));
        let (client, mut connection) = Client::new(opts, 10);

        client
            .publish(topic, QoS::AtLeastOnce, false, payload.as_bytes())
            .map_err(|e| MqttError::Publish {
                topic: topic.to_string(),
                reason: e.to_string(),
            })?;

        // Drive the event loop until the broker acks the publish.
        let deadline = Instant::now() + self.timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(MqttError::AckTimeout(self.timeout_ms()));
            }
            match connection.recv_timeout(remaining) {
                Ok(Ok(Event::Incoming(Incoming::ConnAck(_)))) => {
                    tracing::debug!(host = %self.host, port = self.port, "broker connected");
                }
                Ok(Ok(Event::Incoming(Incoming::PubAck(ack)))) => {
                    tracing::debug!(topic, pkid = ack.pkid, "broker acknowledged publish");
                    break;
                }
                Ok(Ok(other)) => tracing::trace!(event = ?other, "mqtt event"),
                Ok(Err(e)) => return Err(MqttError::Connection(e.to_string())),
                Err(_) => return Err(MqttError::AckTimeout(self.timeout_ms())),
            }
        }

        // Close cleanly; the message is already acked, so drain errors are
        // logged and ignored.
        if let Err(e) = client.disconnect() {
            tracing::warn!(error = %e, "mqtt disconnect request failed");
            return Ok(());
        }
        loop {
            match connection.recv_timeout(Duration::from_millis(250)) {
                Ok(Ok(Event::Outgoing(Outgoing::Disconnect))) | Err(_) => break,
                Ok(Ok(_)) => {}
                Ok(Err(_)) => break,
            }
        }
        Ok(())
    }
}

impl Publisher for MqttPublisher {
    fn publish(
        &mut self,
        topic: &str,
        payload: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.publish_single(topic, payload).map_err(Into::into)
    }
}
