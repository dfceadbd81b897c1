//! Team repository traits
//!
//! Teams, memberships and repository records are separate tables with
//! teams as the parent. Cohort-scoped deletes must run children first.

use async_trait::async_trait;

use super::entity::{Membership, NewTeam, RepositoryRecord, Team, TeamId};
use crate::domain::cohort::CohortId;
use crate::domain::project::ProjectId;
use crate::domain::student::StudentId;
use crate::domain::DomainError;

/// Repository for teams
#[async_trait]
pub trait TeamRepository: Send + Sync + std::fmt::Debug {
    /// Persist a new team; the store assigns the identifier
    async fn create(&self, team: NewTeam) -> Result<Team, DomainError>;

    /// The team a previous request with the same token created in this cohort
    async fn find_by_request_token(
        &self,
        cohort_id: CohortId,
        token: &str,
    ) -> Result<Option<Team>, DomainError>;

    /// Teams of a cohort, newest (highest ID) first
    async fn list_by_cohort(&self, cohort_id: CohortId) -> Result<Vec<Team>, DomainError>;

    /// Delete every team of a cohort, returning the number of rows removed
    async fn delete_by_cohort(&self, cohort_id: CohortId) -> Result<u64, DomainError>;
}

/// Repository for team memberships
#[async_trait]
pub trait MembershipRepository: Send + Sync + std::fmt::Debug {
    async fn create(&self, team_id: TeamId, student_id: StudentId) -> Result<Membership, DomainError>;

    /// Memberships of a team in insertion order
    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Membership>, DomainError>;

    /// Delete memberships whose team belongs to the cohort
    async fn delete_by_cohort(&self, cohort_id: CohortId) -> Result<u64, DomainError>;
}

/// Repository for provisioned repository records
#[async_trait]
pub trait RepositoryRecordRepository: Send + Sync + std::fmt::Debug {
    async fn create(
        &self,
        team_id: TeamId,
        project_id: ProjectId,
        repository: &str,
    ) -> Result<RepositoryRecord, DomainError>;

    /// Records of a team in insertion order
    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<RepositoryRecord>, DomainError>;

    /// Delete records whose team belongs to the cohort
    async fn delete_by_cohort(&self, cohort_id: CohortId) -> Result<u64, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Store whose every operation fails, for exercising storage error paths
    #[derive(Debug, Default)]
    pub struct FailingTeamStore;

    fn failure() -> DomainError {
        DomainError::storage("Mock store configured to fail")
    }

    #[async_trait]
    impl TeamRepository for FailingTeamStore {
        async fn create(&self, _team: NewTeam) -> Result<Team, DomainError> {
            Err(failure())
        }

        async fn find_by_request_token(
            &self,
            _cohort_id: CohortId,
            _token: &str,
        ) -> Result<Option<Team>, DomainError> {
            Err(failure())
        }

        async fn list_by_cohort(&self, _cohort_id: CohortId) -> Result<Vec<Team>, DomainError> {
            Err(failure())
        }

        async fn delete_by_cohort(&self, _cohort_id: CohortId) -> Result<u64, DomainError> {
            Err(failure())
        }
    }

    #[async_trait]
    impl MembershipRepository for FailingTeamStore {
        async fn create(
            &self,
            _team_id: TeamId,
            _student_id: StudentId,
        ) -> Result<Membership, DomainError> {
            Err(failure())
        }

        async fn list_by_team(&self, _team_id: TeamId) -> Result<Vec<Membership>, DomainError> {
            Err(failure())
        }

        async fn delete_by_cohort(&self, _cohort_id: CohortId) -> Result<u64, DomainError> {
            Err(failure())
        }
    }

    #[async_trait]
    impl RepositoryRecordRepository for FailingTeamStore {
        async fn create(
            &self,
            _team_id: TeamId,
            _project_id: ProjectId,
            _repository: &str,
        ) -> Result<RepositoryRecord, DomainError> {
            Err(failure())
        }

        async fn list_by_team(
            &self,
            _team_id: TeamId,
        ) -> Result<Vec<RepositoryRecord>, DomainError> {
            Err(failure())
        }

        async fn delete_by_cohort(&self, _cohort_id: CohortId) -> Result<u64, DomainError> {
            Err(failure())
        }
    }
}
