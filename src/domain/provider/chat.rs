//! Chat channel provider

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::student::Student;
use crate::domain::DomainError;

/// Creates, posts to and removes team chat channels
#[async_trait]
pub trait ChatProvider: Send + Sync + Debug {
    /// Create a channel and invite the students, returning the channel identifier
    async fn create_channel(&self, name: &str, members: &[Student]) -> Result<String, DomainError>;

    async fn send_message(&self, text: &str, channel: &str) -> Result<(), DomainError>;

    async fn delete_channel(&self, channel: &str) -> Result<(), DomainError>;

    /// Get provider name for logging
    fn provider_name(&self) -> &'static str;
}
