//! In-memory team store

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::cohort::CohortId;
use crate::domain::project::ProjectId;
use crate::domain::student::StudentId;
use crate::domain::team::{
    Membership, MembershipId, MembershipRepository, NewTeam, RepositoryRecord, RepositoryRecordId,
    RepositoryRecordRepository, Team, TeamId, TeamRepository,
};
use crate::domain::DomainError;

/// In-memory implementation of the team, membership and repository record repositories
///
/// Identifiers start at 1 and increase per table, like database sequences.
#[derive(Debug)]
pub struct InMemoryTeamStore {
    teams: Arc<RwLock<BTreeMap<TeamId, Team>>>,
    memberships: Arc<RwLock<Vec<Membership>>>,
    repositories: Arc<RwLock<Vec<RepositoryRecord>>>,
    next_team_id: AtomicI64,
    next_membership_id: AtomicI64,
    next_repository_id: AtomicI64,
}

impl InMemoryTeamStore {
    pub fn new() -> Self {
        Self {
            teams: Arc::new(RwLock::new(BTreeMap::new())),
            memberships: Arc::new(RwLock::new(Vec::new())),
            repositories: Arc::new(RwLock::new(Vec::new())),
            next_team_id: AtomicI64::new(1),
            next_membership_id: AtomicI64::new(1),
            next_repository_id: AtomicI64::new(1),
        }
    }

    pub async fn team_count(&self) -> usize {
        self.teams.read().await.len()
    }

    pub async fn membership_count(&self) -> usize {
        self.memberships.read().await.len()
    }

    pub async fn repository_count(&self) -> usize {
        self.repositories.read().await.len()
    }

    async fn team_ids_of(&self, cohort_id: CohortId) -> HashSet<TeamId> {
        self.teams
            .read()
            .await
            .values()
            .filter(|team| team.cohort_id() == cohort_id)
            .map(|team| team.id())
            .collect()
    }
}

impl Default for InMemoryTeamStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamStore {
    async fn create(&self, team: NewTeam) -> Result<Team, DomainError> {
        let mut teams = self.teams.write().await;

        if let Some(token) = team.request_token.as_deref() {
            if teams
                .values()
                .any(|t| t.cohort_id() == team.cohort_id && t.request_token() == Some(token))
            {
                return Err(DomainError::conflict(format!(
                    "Request token '{}' already used in cohort {}",
                    token, team.cohort_id
                )));
            }
        }

        let id = TeamId::new(self.next_team_id.fetch_add(1, Ordering::SeqCst));
        let team = Team::from_new(id, team, Utc::now());

        teams.insert(id, team.clone());
        Ok(team)
    }

    async fn find_by_request_token(
        &self,
        cohort_id: CohortId,
        token: &str,
    ) -> Result<Option<Team>, DomainError> {
        Ok(self
            .teams
            .read()
            .await
            .values()
            .find(|team| team.cohort_id() == cohort_id && team.request_token() == Some(token))
            .cloned())
    }

    async fn list_by_cohort(&self, cohort_id: CohortId) -> Result<Vec<Team>, DomainError> {
        Ok(self
            .teams
            .read()
            .await
            .values()
            .rev()
            .filter(|team| team.cohort_id() == cohort_id)
            .cloned()
            .collect())
    }

    async fn delete_by_cohort(&self, cohort_id: CohortId) -> Result<u64, DomainError> {
        let team_ids = self.team_ids_of(cohort_id).await;
        let memberships = self.memberships.read().await;
        let repositories = self.repositories.read().await;

        if memberships.iter().any(|m| team_ids.contains(&m.team_id()))
            || repositories.iter().any(|r| team_ids.contains(&r.team_id()))
        {
            return Err(DomainError::conflict(format!(
                "Teams of cohort {} still have memberships or repositories",
                cohort_id
            )));
        }
        drop(memberships);
        drop(repositories);

        let mut teams = self.teams.write().await;
        let before = teams.len();
        teams.retain(|_, team| team.cohort_id() != cohort_id);

        Ok((before - teams.len()) as u64)
    }
}

#[async_trait]
impl MembershipRepository for InMemoryTeamStore {
    async fn create(&self, team_id: TeamId, student_id: StudentId) -> Result<Membership, DomainError> {
        if !self.teams.read().await.contains_key(&team_id) {
            return Err(DomainError::not_found(format!("Team {} not found", team_id)));
        }

        let id = MembershipId::new(self.next_membership_id.fetch_add(1, Ordering::SeqCst));
        let membership = Membership::new(id, team_id, student_id);

        self.memberships.write().await.push(membership.clone());
        Ok(membership)
    }

    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Membership>, DomainError> {
        Ok(self
            .memberships
            .read()
            .await
            .iter()
            .filter(|m| m.team_id() == team_id)
            .cloned()
            .collect())
    }

    async fn delete_by_cohort(&self, cohort_id: CohortId) -> Result<u64, DomainError> {
        let team_ids = self.team_ids_of(cohort_id).await;
        let mut memberships = self.memberships.write().await;
        let before = memberships.len();
        memberships.retain(|m| !team_ids.contains(&m.team_id()));

        Ok((before - memberships.len()) as u64)
    }
}

#[async_trait]
impl RepositoryRecordRepository for InMemoryTeamStore {
    async fn create(
        &self,
        team_id: TeamId,
        project_id: ProjectId,
        repository: &str,
    ) -> Result<RepositoryRecord, DomainError> {
        if !self.teams.read().await.contains_key(&team_id) {
            return Err(DomainError::not_found(format!("Team {} not found", team_id)));
        }

        let id = RepositoryRecordId::new(self.next_repository_id.fetch_add(1, Ordering::SeqCst));
        let record = RepositoryRecord::new(id, team_id, project_id, repository);

        self.repositories.write().await.push(record.clone());
        Ok(record)
    }

    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<RepositoryRecord>, DomainError> {
        Ok(self
            .repositories
            .read()
            .await
            .iter()
            .filter(|r| r.team_id() == team_id)
            .cloned()
            .collect())
    }

    async fn delete_by_cohort(&self, cohort_id: CohortId) -> Result<u64, DomainError> {
        let team_ids = self.team_ids_of(cohort_id).await;
        let mut repositories = self.repositories.write().await;
        let before = repositories.len();
        repositories.retain(|r| !team_ids.contains(&r.team_id()));

        Ok((before - repositories.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_team(cohort: i64, name: &str) -> NewTeam {
        NewTeam {
            group_name: name.to_string(),
            cohort_id: CohortId::new(cohort),
            sprint_team: false,
            slack_channel: Some(format!("C-{}", name)),
            request_token: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = InMemoryTeamStore::new();

        let first = TeamRepository::create(&store, new_team(1, "a")).await.unwrap();
        let second = TeamRepository::create(&store, new_team(1, "b")).await.unwrap();

        assert_eq!(first.id(), TeamId::new(1));
        assert_eq!(second.id(), TeamId::new(2));
    }

    #[tokio::test]
    async fn test_list_by_cohort_newest_first() {
        let store = InMemoryTeamStore::new();
        TeamRepository::create(&store, new_team(1, "a")).await.unwrap();
        TeamRepository::create(&store, new_team(2, "other")).await.unwrap();
        TeamRepository::create(&store, new_team(1, "b")).await.unwrap();

        let names: Vec<String> = store
            .list_by_cohort(CohortId::new(1))
            .await
            .unwrap()
            .iter()
            .map(|t| t.group_name().to_string())
            .collect();

        assert_eq!(names, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_find_by_request_token_scoped_to_cohort() {
        let store = InMemoryTeamStore::new();
        let team = TeamRepository::create(
            &store,
            NewTeam {
                request_token: Some("retry-1".to_string()),
                ..new_team(1, "a")
            },
        )
        .await
        .unwrap();

        let found = store
            .find_by_request_token(CohortId::new(1), "retry-1")
            .await
            .unwrap();
        assert_eq!(found.map(|t| t.id()), Some(team.id()));

        assert!(store
            .find_by_request_token(CohortId::new(2), "retry-1")
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_by_request_token(CohortId::new(1), "other")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_request_token_unique_per_cohort() {
        let store = InMemoryTeamStore::new();
        let tokened = |cohort| NewTeam {
            request_token: Some("retry-1".to_string()),
            ..new_team(cohort, "a")
        };

        TeamRepository::create(&store, tokened(1)).await.unwrap();
        TeamRepository::create(&store, tokened(2)).await.unwrap();

        let result = TeamRepository::create(&store, tokened(1)).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert_eq!(store.team_count().await, 2);
    }

    #[tokio::test]
    async fn test_memberships_keep_insertion_order() {
        let store = InMemoryTeamStore::new();
        let team = TeamRepository::create(&store, new_team(1, "a")).await.unwrap();

        for id in [9, 3, 5] {
            MembershipRepository::create(&store, team.id(), StudentId::new(id))
                .await
                .unwrap();
        }

        let students: Vec<i64> = MembershipRepository::list_by_team(&store, team.id())
            .await
            .unwrap()
            .iter()
            .map(|m| m.student_id().value())
            .collect();
        assert_eq!(students, vec![9, 3, 5]);
    }

    #[tokio::test]
    async fn test_child_rows_require_team() {
        let store = InMemoryTeamStore::new();

        let result = MembershipRepository::create(&store, TeamId::new(42), StudentId::new(1)).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_by_cohort_scoped_and_ordered() {
        let store = InMemoryTeamStore::new();
        let ours = TeamRepository::create(&store, new_team(1, "a")).await.unwrap();
        let theirs = TeamRepository::create(&store, new_team(2, "b")).await.unwrap();
        MembershipRepository::create(&store, ours.id(), StudentId::new(1)).await.unwrap();
        MembershipRepository::create(&store, theirs.id(), StudentId::new(2)).await.unwrap();
        RepositoryRecordRepository::create(&store, ours.id(), ProjectId::new(1), "https://x/y")
            .await
            .unwrap();

        // Teams cannot go before their children
        assert!(TeamRepository::delete_by_cohort(&store, CohortId::new(1)).await.is_err());

        assert_eq!(MembershipRepository::delete_by_cohort(&store, CohortId::new(1)).await.unwrap(), 1);
        assert_eq!(RepositoryRecordRepository::delete_by_cohort(&store, CohortId::new(1)).await.unwrap(), 1);
        assert_eq!(TeamRepository::delete_by_cohort(&store, CohortId::new(1)).await.unwrap(), 1);

        assert_eq!(store.team_count().await, 1);
        assert_eq!(store.membership_count().await, 1);
        assert_eq!(store.repository_count().await, 0);
    }
}
