//! Project repository trait

use async_trait::async_trait;

use super::entity::{Project, ProjectId};
use crate::domain::DomainError;

#[async_trait]
pub trait ProjectRepository: Send + Sync + std::fmt::Debug {
    /// Get a project by ID
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, DomainError>;

    /// Insert or replace a project
    async fn save(&self, project: Project) -> Result<Project, DomainError>;
}
