//! Source repository host

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::student::Student;
use crate::domain::DomainError;

/// Parameters for generating a repository from a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryRequest<'a> {
    /// Browser URL of the template repository
    pub template_url: &'a str,
    /// Browser URL of the organization that will own the new repository
    pub organization_url: &'a str,
    pub name: &'a str,
    /// Used for the repository description
    pub project_name: &'a str,
}

/// Outcome of a repository creation request that reached the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryCreation {
    /// The host answered 201
    Created,
    /// The host answered with any other status
    Rejected { status: u16 },
}

impl RepositoryCreation {
    pub fn from_status(status: u16) -> Self {
        if status == 201 {
            Self::Created
        } else {
            Self::Rejected { status }
        }
    }
}

/// Generates repositories and manages collaborator access
///
/// Transport failures are `Err`; an answer from the host is always `Ok`.
#[async_trait]
pub trait SourceHostProvider: Send + Sync + Debug {
    async fn create_repository(
        &self,
        request: RepositoryRequest<'_>,
    ) -> Result<RepositoryCreation, DomainError>;

    /// Whether `organization/repository` already exists on the host
    async fn repository_exists(
        &self,
        organization: &str,
        repository: &str,
    ) -> Result<bool, DomainError>;

    /// Give the student push access to `organization/repository`
    async fn assign_permission(
        &self,
        organization: &str,
        repository: &str,
        student: &Student,
    ) -> Result<(), DomainError>;

    /// Get provider name for logging
    fn provider_name(&self) -> &'static str;
}
