//! Team Maker
//!
//! Forms student teams for a cohort and provisions what each team works in:
//! - A chat channel with the students invited
//! - Client and API repositories generated from the project templates
//! - An issue migration event for the new repositories

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::path::Path;
use std::sync::Arc;

use api::state::AppState;
use config::EventBusBackend;
use domain::EventPublisher;
use infrastructure::{
    catalog::load_fixtures,
    event_bus::{InMemoryEventPublisher, ValkeyConfig, ValkeyEventPublisher},
    github::GithubClient,
    slack::SlackClient,
    storage::StorageFactory,
    team::{TeamMakerDependencies, TeamMakerService, TeamMakerSettings},
};
use tracing::{info, warn};

/// Create the application state from configuration
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = config.storage.to_storage_config()?;
    info!("Storage backend: {:?}", storage_config.storage_type());

    let stores = StorageFactory::create(&storage_config).await?;

    if let Some(path) = config.storage.fixtures_path.as_deref() {
        let path = Path::new(path);

        if path.exists() {
            load_fixtures(
                path,
                stores.cohorts.as_ref(),
                stores.projects.as_ref(),
                stores.students.as_ref(),
            )
            .await?;
        } else {
            warn!(path = %path.display(), "Fixtures file not found, skipping");
        }
    }

    if config.slack.token.is_empty() {
        warn!("Slack token is not configured; chat calls will be rejected");
    }
    if config.github.token.is_empty() {
        warn!("GitHub token is not configured; repository calls will be rejected");
    }

    let chat = Arc::new(SlackClient::new(config.slack.to_client_config())?);
    let source_host = Arc::new(GithubClient::new(config.github.to_client_config())?);
    let events = create_event_publisher(config).await?;

    let settings = TeamMakerSettings {
        event_topic: config.event_bus.topic.clone(),
        repository_web_url: config.github.web_url.clone(),
    };

    let team_maker = TeamMakerService::new(TeamMakerDependencies {
        cohorts: stores.cohorts.clone(),
        projects: stores.projects,
        students: stores.students,
        teams: stores.teams,
        memberships: stores.memberships,
        repositories: stores.repositories,
        chat,
        source_host,
        events,
    })
    .with_settings(settings);

    Ok(AppState::new(Arc::new(team_maker), stores.cohorts))
}

async fn create_event_publisher(config: &AppConfig) -> anyhow::Result<Arc<dyn EventPublisher>> {
    match config.event_bus.backend {
        EventBusBackend::Valkey => {
            info!("Connecting to Valkey event bus...");
            let publisher =
                ValkeyEventPublisher::connect(&ValkeyConfig::new(&config.event_bus.url)).await?;
            info!("Valkey connection established");
            Ok(Arc::new(publisher))
        }
        EventBusBackend::Memory => {
            info!("Using in-memory event bus; events are not delivered");
            Ok(Arc::new(InMemoryEventPublisher::new()))
        }
    }
}
