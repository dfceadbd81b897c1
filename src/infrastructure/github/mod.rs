//! GitHub REST source host

mod client;

pub use client::{GithubClient, GithubConfig};
