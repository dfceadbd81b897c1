//! Team maker request and response bodies

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{CohortId, ProjectId, RepositoryRecord, StudentId, TeamDetails};
use crate::infrastructure::team::CreateTeamRequest;

/// `?cohort=` query of the list and reset endpoints
#[derive(Debug, Default, Deserialize)]
pub struct CohortParams {
    pub cohort: Option<String>,
}

/// Body of `POST /teammaker`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamBody {
    /// Accepted as a number or a numeric string
    #[serde(default)]
    pub cohort: Value,
    #[serde(default)]
    pub students: Vec<i64>,
    #[serde(default)]
    pub group_project: Option<i64>,
    #[serde(default)]
    pub weekly_prefix: Option<String>,
    #[serde(default)]
    pub request_token: Option<String>,
}

impl CreateTeamBody {
    /// Build the orchestrator request. A body token wins over the header one.
    pub fn into_request(self, header_token: Option<String>) -> CreateTeamRequest {
        let cohort = match &self.cohort {
            Value::Number(n) => n.as_i64().map(CohortId::new),
            Value::String(s) => CohortId::parse(s),
            _ => None,
        };

        CreateTeamRequest {
            cohort,
            students: self.students.into_iter().map(StudentId::new).collect(),
            group_project: self.group_project.map(ProjectId::new),
            weekly_prefix: self.weekly_prefix.unwrap_or_default(),
            request_token: self.request_token.or(header_token),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStudentResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryResponse {
    pub id: i64,
    pub project: i64,
    pub repository: String,
}

impl From<&RepositoryRecord> for RepositoryResponse {
    fn from(record: &RepositoryRecord) -> Self {
        Self {
            id: record.id().value(),
            project: record.project_id().value(),
            repository: record.repository().to_string(),
        }
    }
}

/// Serialized team with its non-staff roster and repositories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamResponse {
    pub id: i64,
    pub group_name: String,
    pub cohort: i64,
    pub sprint_team: bool,
    pub slack_channel: Option<String>,
    pub students: Vec<TeamStudentResponse>,
    pub repositories: Vec<RepositoryResponse>,
}

impl From<&TeamDetails> for TeamResponse {
    fn from(details: &TeamDetails) -> Self {
        let team = &details.team;

        Self {
            id: team.id().value(),
            group_name: team.group_name().to_string(),
            cohort: team.cohort_id().value(),
            sprint_team: team.sprint_team(),
            slack_channel: team.slack_channel().map(str::to_string),
            students: details
                .roster()
                .map(|s| TeamStudentResponse {
                    id: s.id().value(),
                    name: s.name().to_string(),
                })
                .collect(),
            repositories: details.repositories.iter().map(RepositoryResponse::from).collect(),
        }
    }
}
