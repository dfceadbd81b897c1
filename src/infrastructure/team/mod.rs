//! Team infrastructure implementations

mod in_memory;
mod postgres;
mod saga;
mod service;

pub use in_memory::InMemoryTeamStore;
pub use postgres::PostgresTeamStore;
pub use saga::{ProvisioningStep, SagaLog};
pub use service::{
    CreateTeamRequest, ResetSummary, TeamMakerDependencies, TeamMakerService, TeamMakerSettings,
    DEFAULT_EVENT_TOPIC,
};
