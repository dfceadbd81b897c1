//! Domain layer - Core business logic and entities

pub mod cohort;
pub mod error;
pub mod project;
pub mod provider;
pub mod student;
pub mod team;

pub use cohort::{Cohort, CohortId, CohortRepository};
pub use error::DomainError;
pub use project::{Project, ProjectId, ProjectRepository, RepositoryKind};
pub use provider::{
    ChatProvider, EventPublisher, RepositoryCreation, RepositoryRequest, SourceHostProvider,
};
pub use student::{Student, StudentId, StudentRepository};
pub use team::{
    Membership, MembershipId, MembershipRepository, NewTeam, RepositoryRecord, RepositoryRecordId,
    RepositoryRecordRepository, Team, TeamDetails, TeamId, TeamMakerError, TeamRepository,
};
