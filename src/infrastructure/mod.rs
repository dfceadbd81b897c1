//! Infrastructure layer - Storage and external service implementations

pub mod catalog;
pub mod event_bus;
pub mod github;
pub mod logging;
pub mod slack;
pub mod storage;
pub mod team;
