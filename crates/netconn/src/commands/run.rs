use crate::nats::NatsPublisher;
use anyhow::Context;
use futures_util::StreamExt;
use netconn_cloud_aws::Ec2ClientFactory;
use netconn_config::ConnectorConfig;
use netconn_core::{ProvisioningEngine, WaitConfig};
use std::sync::Arc;

/// Command line values that win over the config file and environment
#[derive(Debug, Default)]
pub struct Overrides {
    pub nats_uri: Option<String>,
    pub subjects: Vec<String>,
    pub poll_interval_ms: Option<u64>,
    pub max_poll_attempts: Option<u32>,
}

impl Overrides {
    fn apply(self, config: &mut ConnectorConfig) {
        if let Some(uri) = self.nats_uri {
            config.nats_uri = uri;
        }
        if !self.subjects.is_empty() {
            config.subjects = self.subjects;
        }
        if let Some(ms) = self.poll_interval_ms {
            config.poll_interval_ms = ms;
        }
        if self.max_poll_attempts.is_some() {
            config.max_poll_attempts = self.max_poll_attempts;
        }
    }
}

pub async fn handle(overrides: Overrides) -> anyhow::Result<()> {
    let mut config = ConnectorConfig::load()?;
    overrides.apply(&mut config);
    config.validate()?;

    let client = async_nats::connect(config.nats_uri.as_str())
        .await
        .with_context(|| format!("Failed to connect to NATS at {}", config.nats_uri))?;
    tracing::info!(uri = %config.nats_uri, "Connected to NATS");

    let engine = ProvisioningEngine::new(
        Arc::new(NatsPublisher::new(client.clone())),
        Arc::new(Ec2ClientFactory),
    )
    .with_wait_config(WaitConfig {
        interval: config.poll_interval(),
        max_attempts: config.max_poll_attempts,
    });
    let engine = Arc::new(engine);

    let mut consumers = Vec::with_capacity(config.subjects.len());
    for subject in &config.subjects {
        let subscriber = client
            .subscribe(subject.clone())
            .await
            .with_context(|| format!("Failed to subscribe to {}", subject))?;
        tracing::info!("listening for {}", subject);
        consumers.push(tokio::spawn(consume(subscriber, engine.clone())));
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    for consumer in consumers {
        consumer.abort();
    }
    client.flush().await.context("Failed to flush NATS connection")?;

    Ok(())
}

/// Handle every message of one subscription on its own task
async fn consume(mut subscriber: async_nats::Subscriber, engine: Arc<ProvisioningEngine>) {
    while let Some(message) = subscriber.next().await {
        let engine = engine.clone();
        tokio::spawn(async move {
            let subject = message.subject.to_string();
            match engine.handle(&subject, &message.payload).await {
                Ok(outcome) => tracing::debug!(subject = %subject, ?outcome, "Message settled"),
                // Outcome could not be published; the request is dropped
                Err(e) => tracing::error!(subject = %subject, "Error: {}", e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win() {
        let mut config = ConnectorConfig::default();
        Overrides {
            nats_uri: Some("nats://bus:4222".to_string()),
            subjects: vec!["network.create.aws".to_string()],
            poll_interval_ms: Some(250),
            max_poll_attempts: Some(10),
        }
        .apply(&mut config);

        assert_eq!(config.nats_uri, "nats://bus:4222");
        assert_eq!(config.subjects, vec!["network.create.aws"]);
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.max_poll_attempts, Some(10));
    }

    #[test]
    fn test_empty_overrides_keep_config() {
        let mut config = ConnectorConfig::default();
        Overrides::default().apply(&mut config);
        assert_eq!(config, ConnectorConfig::default());
    }
}
