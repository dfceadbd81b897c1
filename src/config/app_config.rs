use serde::Deserialize;

use crate::infrastructure::event_bus::ValkeyConfig;
use crate::infrastructure::github::GithubConfig;
use crate::infrastructure::slack::SlackConfig;
use crate::infrastructure::storage::{PostgresConfig, StorageConfig, StorageType};
use crate::infrastructure::team::DEFAULT_EVENT_TOPIC;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
    pub slack: SlackSettings,
    pub github: GithubSettings,
    pub event_bus: EventBusSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `memory` or `postgres`
    pub backend: String,
    pub database_url: String,
    pub max_connections: u32,
    /// JSON file with cohorts, projects and students loaded at startup
    pub fixtures_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SlackSettings {
    pub base_url: String,
    pub token: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GithubSettings {
    pub api_url: String,
    /// Browser base URL for stored repository links
    pub web_url: String,
    pub token: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventBusBackend {
    #[default]
    Memory,
    Valkey,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventBusSettings {
    pub backend: EventBusBackend,
    pub url: String,
    pub topic: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: PostgresConfig::default().url,
            max_connections: 10,
            fixtures_path: None,
        }
    }
}

impl Default for SlackSettings {
    fn default() -> Self {
        let defaults = SlackConfig::default();
        Self {
            base_url: defaults.base_url,
            token: String::new(),
            timeout_secs: defaults.timeout_secs,
        }
    }
}

impl Default for GithubSettings {
    fn default() -> Self {
        let defaults = GithubConfig::default();
        Self {
            api_url: defaults.api_url,
            web_url: "https://github.com".to_string(),
            token: String::new(),
            timeout_secs: defaults.timeout_secs,
        }
    }
}

impl Default for EventBusSettings {
    fn default() -> Self {
        Self {
            backend: EventBusBackend::default(),
            url: ValkeyConfig::default().url,
            topic: DEFAULT_EVENT_TOPIC.to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl StorageSettings {
    pub fn to_storage_config(&self) -> Result<StorageConfig, config::ConfigError> {
        match StorageType::from_str(&self.backend) {
            Some(StorageType::InMemory) => Ok(StorageConfig::InMemory),
            Some(StorageType::Postgres) => Ok(StorageConfig::Postgres(
                PostgresConfig::new(&self.database_url).with_max_connections(self.max_connections),
            )),
            None => Err(config::ConfigError::Message(format!(
                "Unknown storage backend '{}'",
                self.backend
            ))),
        }
    }
}

impl SlackSettings {
    pub fn to_client_config(&self) -> SlackConfig {
        SlackConfig {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

impl GithubSettings {
    pub fn to_client_config(&self) -> GithubConfig {
        GithubConfig {
            api_url: self.api_url.clone(),
            token: self.token.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}
