//! Event bus publisher

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Fire-and-forget publisher; no acknowledgement from subscribers is awaited
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync + std::fmt::Debug {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), DomainError>;
}
