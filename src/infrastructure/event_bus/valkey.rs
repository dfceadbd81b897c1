//! Valkey (Redis protocol) publisher

use std::fmt;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::debug;

use crate::domain::provider::EventPublisher;
use crate::domain::DomainError;

/// Connection settings for the Valkey server
#[derive(Debug, Clone)]
pub struct ValkeyConfig {
    /// Connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
}

impl Default for ValkeyConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

impl ValkeyConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Publishes events with `PUBLISH`; the connection manager reconnects on its own
#[derive(Clone)]
pub struct ValkeyEventPublisher {
    connection: ConnectionManager,
}

impl fmt::Debug for ValkeyEventPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValkeyEventPublisher")
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl ValkeyEventPublisher {
    pub async fn connect(config: &ValkeyConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str()).map_err(|e| {
            DomainError::provider("valkey", format!("Failed to create client: {}", e))
        })?;

        let connection = ConnectionManager::new(client).await.map_err(|e| {
            DomainError::provider("valkey", format!("Failed to connect: {}", e))
        })?;

        Ok(Self { connection })
    }
}

#[async_trait]
impl EventPublisher for ValkeyEventPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        let receivers: i64 = conn.publish(topic, payload).await.map_err(|e| {
            DomainError::provider("valkey", format!("Failed to publish to '{}': {}", topic, e))
        })?;

        debug!(topic, receivers, "Event published");
        Ok(())
    }
}
