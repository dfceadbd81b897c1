//! Event bus publishers

mod in_memory;
mod valkey;

pub use in_memory::{InMemoryEventPublisher, PublishedEvent};
pub use valkey::{ValkeyConfig, ValkeyEventPublisher};
