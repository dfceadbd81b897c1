//! Slack Web API chat provider

mod client;

pub use client::{SlackClient, SlackConfig};
