//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, EventBusBackend, EventBusSettings, GithubSettings, LogFormat, LoggingConfig,
    ServerConfig, SlackSettings, StorageSettings,
};
