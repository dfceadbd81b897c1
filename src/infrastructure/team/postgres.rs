//! PostgreSQL team store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::cohort::CohortId;
use crate::domain::project::ProjectId;
use crate::domain::student::StudentId;
use crate::domain::team::{
    Membership, MembershipId, MembershipRepository, NewTeam, RepositoryRecord, RepositoryRecordId,
    RepositoryRecordRepository, Team, TeamId, TeamRepository,
};
use crate::domain::DomainError;

/// PostgreSQL implementation of the team, membership and repository record repositories
#[derive(Debug, Clone)]
pub struct PostgresTeamStore {
    pool: PgPool,
}

impl PostgresTeamStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TEAM_COLUMNS: &str =
    "id, group_name, cohort_id, sprint_team, slack_channel, request_token, created_at";

const DELETE_MEMBERSHIPS_BY_COHORT: &str = r#"
    DELETE FROM team_memberships
    WHERE team_id IN (SELECT id FROM teams WHERE cohort_id = $1)
"#;

const DELETE_REPOSITORIES_BY_COHORT: &str = r#"
    DELETE FROM team_repositories
    WHERE team_id IN (SELECT id FROM teams WHERE cohort_id = $1)
"#;

const DELETE_TEAMS_BY_COHORT: &str = "DELETE FROM teams WHERE cohort_id = $1";

/// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Column values of one `teams` row
#[derive(Debug, Clone)]
struct TeamRow {
    id: i64,
    group_name: String,
    cohort_id: i64,
    sprint_team: bool,
    slack_channel: Option<String>,
    request_token: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Team::from_new(
            TeamId::new(row.id),
            NewTeam {
                group_name: row.group_name,
                cohort_id: CohortId::new(row.cohort_id),
                sprint_team: row.sprint_team,
                slack_channel: row.slack_channel,
                request_token: row.request_token,
            },
            row.created_at,
        )
    }
}

fn row_to_team(row: &PgRow) -> Team {
    TeamRow {
        id: row.get("id"),
        group_name: row.get("group_name"),
        cohort_id: row.get("cohort_id"),
        sprint_team: row.get("sprint_team"),
        slack_channel: row.get("slack_channel"),
        request_token: row.get("request_token"),
        created_at: row.get("created_at"),
    }
    .into()
}

fn create_team_error(e: sqlx::Error) -> DomainError {
    let unique_violation = e
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION);

    if unique_violation {
        DomainError::conflict(format!("Team request token already used: {}", e))
    } else {
        DomainError::storage(format!("Failed to create team: {}", e))
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamStore {
    async fn create(&self, team: NewTeam) -> Result<Team, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO teams (group_name, cohort_id, sprint_team, slack_channel, request_token)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at
            "#,
        )
        .bind(&team.group_name)
        .bind(team.cohort_id.value())
        .bind(team.sprint_team)
        .bind(team.slack_channel.as_deref())
        .bind(team.request_token.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(create_team_error)?;

        Ok(Team::from_new(
            TeamId::new(row.get("id")),
            team,
            row.get("created_at"),
        ))
    }

    async fn find_by_request_token(
        &self,
        cohort_id: CohortId,
        token: &str,
    ) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM teams WHERE cohort_id = $1 AND request_token = $2",
            TEAM_COLUMNS
        ))
        .bind(cohort_id.value())
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to find team by request token: {}", e)))?;

        Ok(row.as_ref().map(row_to_team))
    }

    async fn list_by_cohort(&self, cohort_id: CohortId) -> Result<Vec<Team>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM teams WHERE cohort_id = $1 ORDER BY id DESC",
            TEAM_COLUMNS
        ))
        .bind(cohort_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list teams: {}", e)))?;

        Ok(rows.iter().map(row_to_team).collect())
    }

    async fn delete_by_cohort(&self, cohort_id: CohortId) -> Result<u64, DomainError> {
        let result = sqlx::query(DELETE_TEAMS_BY_COHORT)
            .bind(cohort_id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete teams: {}", e)))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl MembershipRepository for PostgresTeamStore {
    async fn create(&self, team_id: TeamId, student_id: StudentId) -> Result<Membership, DomainError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO team_memberships (team_id, student_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(team_id.value())
        .bind(student_id.value())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create membership: {}", e)))?;

        Ok(Membership::new(MembershipId::new(id), team_id, student_id))
    }

    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Membership>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, team_id, student_id FROM team_memberships WHERE team_id = $1 ORDER BY id",
        )
        .bind(team_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list memberships: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| {
                Membership::new(
                    MembershipId::new(row.get("id")),
                    TeamId::new(row.get("team_id")),
                    StudentId::new(row.get("student_id")),
                )
            })
            .collect())
    }

    async fn delete_by_cohort(&self, cohort_id: CohortId) -> Result<u64, DomainError> {
        let result = sqlx::query(DELETE_MEMBERSHIPS_BY_COHORT)
            .bind(cohort_id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete memberships: {}", e)))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RepositoryRecordRepository for PostgresTeamStore {
    async fn create(
        &self,
        team_id: TeamId,
        project_id: ProjectId,
        repository: &str,
    ) -> Result<RepositoryRecord, DomainError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO team_repositories (team_id, project_id, repository)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(team_id.value())
        .bind(project_id.value())
        .bind(repository)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create repository record: {}", e)))?;

        Ok(RepositoryRecord::new(
            RepositoryRecordId::new(id),
            team_id,
            project_id,
            repository,
        ))
    }

    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<RepositoryRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, team_id, project_id, repository
            FROM team_repositories
            WHERE team_id = $1
            ORDER BY id
            "#,
        )
        .bind(team_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list repository records: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| {
                RepositoryRecord::new(
                    RepositoryRecordId::new(row.get("id")),
                    TeamId::new(row.get("team_id")),
                    ProjectId::new(row.get("project_id")),
                    row.get::<String, _>("repository"),
                )
            })
            .collect())
    }

    async fn delete_by_cohort(&self, cohort_id: CohortId) -> Result<u64, DomainError> {
        let result = sqlx::query(DELETE_REPOSITORIES_BY_COHORT)
            .bind(cohort_id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete repository records: {}", e)))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(request_token: Option<&str>) -> TeamRow {
        TeamRow {
            id: 12,
            group_name: "kennels-fall-24-ab12cd".to_string(),
            cohort_id: 1,
            sprint_team: true,
            slack_channel: Some("C777".to_string()),
            request_token: request_token.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_team_row_maps_every_column() {
        let source = row(Some("retry-1"));
        let created_at = source.created_at;
        let team = Team::from(source);

        assert_eq!(team.id(), TeamId::new(12));
        assert_eq!(team.group_name(), "kennels-fall-24-ab12cd");
        assert_eq!(team.cohort_id(), CohortId::new(1));
        assert!(team.sprint_team());
        assert_eq!(team.slack_channel(), Some("C777"));
        assert_eq!(team.request_token(), Some("retry-1"));
        assert_eq!(team.created_at(), created_at);
    }

    #[test]
    fn test_team_row_without_channel_or_token() {
        let team = Team::from(TeamRow {
            slack_channel: None,
            ..row(None)
        });

        assert_eq!(team.slack_channel(), None);
        assert_eq!(team.request_token(), None);
    }

    #[test]
    fn test_team_columns_match_row() {
        for column in [
            "id",
            "group_name",
            "cohort_id",
            "sprint_team",
            "slack_channel",
            "request_token",
            "created_at",
        ] {
            assert!(TEAM_COLUMNS.split(", ").any(|c| c == column), "{}", column);
        }
    }

    #[test]
    fn test_child_deletes_scoped_to_cohort_teams() {
        for (sql, table) in [
            (DELETE_MEMBERSHIPS_BY_COHORT, "team_memberships"),
            (DELETE_REPOSITORIES_BY_COHORT, "team_repositories"),
        ] {
            let sql = sql.split_whitespace().collect::<Vec<_>>().join(" ");
            assert_eq!(
                sql,
                format!(
                    "DELETE FROM {} WHERE team_id IN (SELECT id FROM teams WHERE cohort_id = $1)",
                    table
                )
            );
        }
    }

    #[test]
    fn test_team_delete_scoped_to_cohort() {
        assert_eq!(DELETE_TEAMS_BY_COHORT, "DELETE FROM teams WHERE cohort_id = $1");
    }

    #[test]
    fn test_non_database_error_is_storage() {
        let error = create_team_error(sqlx::Error::RowNotFound);
        assert!(matches!(error, DomainError::Storage { .. }));
    }
}
