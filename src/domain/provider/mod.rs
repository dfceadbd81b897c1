//! Collaborators the team maker provisions through
//!
//! Each external system sits behind a trait so the orchestrator can be built
//! with real clients in production and recording fakes in tests.

mod chat;
mod event_bus;
mod source_host;

pub use chat::ChatProvider;
pub use event_bus::EventPublisher;
pub use source_host::{RepositoryCreation, RepositoryRequest, SourceHostProvider};

#[cfg(test)]
pub use event_bus::MockEventPublisher;

#[cfg(test)]
pub mod mock {
    pub use super::chat::mock::MockChatProvider;
    pub use super::source_host::mock::MockSourceHost;
}
