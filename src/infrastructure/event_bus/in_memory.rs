//! In-memory publisher for local runs and tests

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::provider::EventPublisher;
use crate::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedEvent {
    pub topic: String,
    pub payload: String,
}

/// Keeps every published event in memory
#[derive(Debug, Default)]
pub struct InMemoryEventPublisher {
    events: RwLock<Vec<PublishedEvent>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn published(&self) -> Vec<PublishedEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), DomainError> {
        info!(topic, payload, "Event recorded in memory");

        self.events.write().await.push(PublishedEvent {
            topic: topic.to_string(),
            payload: payload.to_string(),
        });
        Ok(())
    }
}
