//! Slack Web API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::provider::ChatProvider;
use crate::domain::student::Student;
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Web API base URL, e.g. `https://slack.com/api`
    pub base_url: String,
    /// Bot token
    pub token: String,
    pub timeout_secs: u64,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            base_url: "https://slack.com/api".to_string(),
            token: String::new(),
            timeout_secs: 30,
        }
    }
}

impl SlackConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct ChannelInfo {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CreatedChannel {
    channel: ChannelInfo,
}

/// Chat provider backed by the Slack Web API
///
/// Slack answers 200 for most failures, so every reply is checked for `"ok": true`.
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: Client,
    config: SlackConfig,
}

impl SlackClient {
    pub fn new(config: SlackConfig) -> Result<Self, DomainError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<T, DomainError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), method);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::provider("slack", format!("{} failed: {}", method, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::provider(
                "slack",
                format!("{} returned HTTP {}", method, status),
            ));
        }

        let reply: serde_json::Value = response.json().await.map_err(|e| {
            DomainError::provider("slack", format!("Invalid {} response: {}", method, e))
        })?;

        if reply.get("ok").and_then(|v| v.as_bool()) != Some(true) {
            let error = reply
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown_error");
            return Err(DomainError::provider("slack", format!("{}: {}", method, error)));
        }

        serde_json::from_value(reply).map_err(|e| {
            DomainError::provider("slack", format!("Unexpected {} response: {}", method, e))
        })
    }
}

#[async_trait]
impl ChatProvider for SlackClient {
    async fn create_channel(&self, name: &str, members: &[Student]) -> Result<String, DomainError> {
        let created: CreatedChannel = self
            .call("conversations.create", json!({ "name": name }))
            .await?;
        let channel = created.channel.id;

        let users: Vec<&str> = members
            .iter()
            .map(|s| s.slack_handle())
            .filter(|handle| !handle.is_empty())
            .collect();

        if !users.is_empty() {
            let invited: Result<IgnoredAny, DomainError> = self
                .call(
                    "conversations.invite",
                    json!({ "channel": channel, "users": users.join(",") }),
                )
                .await;

            // A channel nobody was invited to is archived before the error surfaces
            if let Err(e) = invited {
                if let Err(archive) = self.delete_channel(&channel).await {
                    warn!(channel = %channel, error = %archive, "Failed to archive uninvited Slack channel");
                }
                return Err(e);
            }
        }

        debug!(channel = %channel, invited = users.len(), "Slack channel ready");
        Ok(channel)
    }

    async fn send_message(&self, text: &str, channel: &str) -> Result<(), DomainError> {
        let _: IgnoredAny = self
            .call("chat.postMessage", json!({ "channel": channel, "text": text }))
            .await?;
        Ok(())
    }

    async fn delete_channel(&self, channel: &str) -> Result<(), DomainError> {
        let _: IgnoredAny = self
            .call("conversations.archive", json!({ "channel": channel }))
            .await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "slack"
    }
}
