//! Outbound side of the message bus

use crate::error::Result;
use async_trait::async_trait;

/// Topic that receives successful outcomes for `subject`
pub fn done_topic(subject: &str) -> String {
    format!("{}.done", subject)
}

/// Topic that receives failed outcomes for `subject`
pub fn error_topic(subject: &str) -> String {
    format!("{}.error", subject)
}

/// Publishes raw payloads to bus topics
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()>;
}

#[cfg(test)]
pub use memory::MemoryBus;
