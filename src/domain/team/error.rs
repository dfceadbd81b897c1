//! Team maker error taxonomy

use thiserror::Error;

use crate::domain::project::RepositoryKind;
use crate::domain::DomainError;

/// Errors reported by the team maker operations
///
/// The display string is what callers see as the response message.
#[derive(Debug, Error)]
pub enum TeamMakerError {
    #[error("Invalid cohort ID")]
    InvalidCohort,

    #[error("Invalid project ID")]
    InvalidProject,

    #[error("No cohort ID provided")]
    MissingCohort,

    #[error("Cohort matching query does not exist")]
    CohortNotFound,

    #[error("Failed to create chat channel: {0}")]
    ChannelProvisionFailure(String),

    #[error("Failed to create {kind} repository")]
    RepositoryProvisionFailure { kind: RepositoryKind },

    #[error("Failed to grant {student} access to {kind} repository: {message}")]
    PermissionGrantFailure {
        kind: RepositoryKind,
        student: String,
        message: String,
    },

    #[error("Failed to notify team channel: {0}")]
    ChannelNotificationFailure(String),

    #[error("{0}")]
    Persistence(#[from] DomainError),
}

impl TeamMakerError {
    /// True for errors caused by the request rather than by a collaborator
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCohort | Self::InvalidProject | Self::MissingCohort | Self::CohortNotFound
        )
    }
}
