//! Provisioning engine
//!
//! Turns one raw bus message into exactly one publication on either
//! `<subject>.done` or `<subject>.error`.

use crate::action::Action;
use crate::bus::{MessagePublisher, error_topic};
use crate::error::{EventError, Result};
use crate::event::EventEnvelope;
use crate::network::{create_network, delete_network};
use crate::waiter::WaitConfig;
use netconn_cloud::{NetworkClient, NetworkClientFactory};
use std::sync::Arc;

/// How a message was settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Published to `.done`
    Completed,
    /// Published to `.error` with this message
    Failed(String),
    /// Payload could not be decoded; raw bytes republished to `.error`
    Malformed,
}

/// Handles network events. Cheap to share across tasks behind an `Arc`.
pub struct ProvisioningEngine {
    publisher: Arc<dyn MessagePublisher>,
    clients: Arc<dyn NetworkClientFactory>,
    wait: WaitConfig,
}

impl ProvisioningEngine {
    pub fn new(publisher: Arc<dyn MessagePublisher>, clients: Arc<dyn NetworkClientFactory>) -> Self {
        Self {
            publisher,
            clients,
            wait: WaitConfig::default(),
        }
    }

    pub fn with_wait_config(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    /// Process one message and publish its outcome.
    ///
    /// Request failures are published, not returned. `Err` means the outcome
    /// itself could not be encoded or published.
    pub async fn handle(&self, subject: &str, payload: &[u8]) -> Result<Outcome> {
        let mut event = match EventEnvelope::decode(subject, payload) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(subject = %subject, "{}", err);
                self.publisher
                    .publish(&error_topic(subject), payload.to_vec())
                    .await?;
                return Ok(Outcome::Malformed);
            }
        };

        tracing::info!(
            subject = %subject,
            action = ?event.action(),
            request = %event.uuid,
            "Received network event"
        );

        let result = match event.validate() {
            Ok(()) => self.dispatch(&mut event).await,
            Err(err) => Err(err.into()),
        };

        match result {
            Ok(()) => {
                event.complete(self.publisher.as_ref()).await?;
                if event.error_message.is_empty() {
                    Ok(Outcome::Completed)
                } else {
                    Ok(Outcome::Failed(event.error_message.clone()))
                }
            }
            Err(err) => {
                event.fail(&err, self.publisher.as_ref()).await?;
                Ok(Outcome::Failed(event.error_message.clone()))
            }
        }
    }

    async fn dispatch(&self, event: &mut EventEnvelope) -> Result<()> {
        match event.action() {
            Some(Action::Create) => self.create(event).await,
            Some(Action::Update) => self.update(event),
            Some(Action::Delete) => self.delete(event).await,
            Some(Action::Get) => self.get(event),
            None => Err(EventError::UnrecognizedAction(event.subject().to_string())),
        }
    }

    async fn create(&self, event: &mut EventEnvelope) -> Result<()> {
        let client = self.connect(event).await?;
        create_network(client.as_ref(), event).await?;
        Ok(())
    }

    async fn delete(&self, event: &mut EventEnvelope) -> Result<()> {
        let client = self.connect(event).await?;
        delete_network(client.as_ref(), event, &self.wait).await?;
        Ok(())
    }

    fn update(&self, event: &EventEnvelope) -> Result<()> {
        Err(EventError::Unsupported(event.subject().to_string()))
    }

    fn get(&self, event: &EventEnvelope) -> Result<()> {
        Err(EventError::Unsupported(event.subject().to_string()))
    }

    /// Fresh session per request; never cached
    async fn connect(&self, event: &EventEnvelope) -> Result<Box<dyn NetworkClient>> {
        Ok(self.clients.connect(&event.credentials()).await?)
    }
}
