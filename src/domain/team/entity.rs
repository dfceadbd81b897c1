//! Team, membership and repository record entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::cohort::CohortId;
use crate::domain::project::ProjectId;
use crate::domain::student::{Student, StudentId};

/// Team identifier, assigned by the store in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(i64);

impl TeamId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fields of a team before the store assigns its identifier
#[derive(Debug, Clone, PartialEq)]
pub struct NewTeam {
    pub group_name: String,
    pub cohort_id: CohortId,
    pub sprint_team: bool,
    pub slack_channel: Option<String>,
    /// Caller-supplied idempotency token, unique per cohort
    pub request_token: Option<String>,
}

/// A group of students within one cohort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    group_name: String,
    cohort_id: CohortId,
    /// True when the team was formed for a graded group project
    sprint_team: bool,
    /// Chat channel, known once provisioning succeeded
    slack_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_token: Option<String>,
    created_at: DateTime<Utc>,
}

impl Team {
    pub fn from_new(id: TeamId, new: NewTeam, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            group_name: new.group_name,
            cohort_id: new.cohort_id,
            sprint_team: new.sprint_team,
            slack_channel: new.slack_channel,
            request_token: new.request_token,
            created_at,
        }
    }

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn cohort_id(&self) -> CohortId {
        self.cohort_id
    }

    pub fn sprint_team(&self) -> bool {
        self.sprint_team
    }

    pub fn slack_channel(&self) -> Option<&str> {
        self.slack_channel.as_deref()
    }

    pub fn request_token(&self) -> Option<&str> {
        self.request_token.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Membership identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipId(i64);

impl MembershipId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// One student placed on one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    id: MembershipId,
    team_id: TeamId,
    student_id: StudentId,
}

impl Membership {
    pub fn new(id: MembershipId, team_id: TeamId, student_id: StudentId) -> Self {
        Self {
            id,
            team_id,
            student_id,
        }
    }

    pub fn id(&self) -> MembershipId {
        self.id
    }

    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    pub fn student_id(&self) -> StudentId {
        self.student_id
    }
}

/// Repository record identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryRecordId(i64);

impl RepositoryRecordId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// A repository that the source host confirmed it created for a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    id: RepositoryRecordId,
    team_id: TeamId,
    project_id: ProjectId,
    repository: String,
}

impl RepositoryRecord {
    pub fn new(
        id: RepositoryRecordId,
        team_id: TeamId,
        project_id: ProjectId,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            id,
            team_id,
            project_id,
            repository: repository.into(),
        }
    }

    pub fn id(&self) -> RepositoryRecordId {
        self.id
    }

    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Browser URL of the repository
    pub fn repository(&self) -> &str {
        &self.repository
    }
}

/// A team together with its roster and repositories, as returned by the team maker
#[derive(Debug, Clone, PartialEq)]
pub struct TeamDetails {
    pub team: Team,
    pub memberships: Vec<Membership>,
    /// Directory entries for the memberships that resolve to a known user
    pub students: Vec<Student>,
    pub repositories: Vec<RepositoryRecord>,
}

impl TeamDetails {
    /// Members shown on rosters; staff are left out
    pub fn roster(&self) -> impl Iterator<Item = &Student> {
        self.students.iter().filter(|s| !s.is_staff())
    }
}
