use async_trait::async_trait;
use netconn_core::{EventError, MessagePublisher};

/// Publishes outcomes over a core NATS connection
#[derive(Clone)]
pub struct NatsPublisher {
    client: async_nats::Client,
}

impl NatsPublisher {
    pub fn new(client: async_nats::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessagePublisher for NatsPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> netconn_core::Result<()> {
        self.client
            .publish(topic.to_string(), payload.into())
            .await
            .map_err(|e| EventError::Publish {
                topic: topic.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(topic = %topic, "Published");
        Ok(())
    }
}
