//! Cohort entity and related types

use serde::{Deserialize, Serialize};

/// Cohort identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CohortId(i64);

impl CohortId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Parse an identifier as it arrives in a query string or request body
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<i64>().ok().map(Self)
    }
}

impl std::fmt::Display for CohortId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A group of students taking the course together
///
/// Reference data: the team maker reads cohorts but never changes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cohort {
    id: CohortId,
    name: String,
    /// Slack channel used for cohort-wide notifications
    slack_channel: String,
    /// GitHub organization that owns student repositories, e.g. `https://github.com/nss-cohort-50`
    student_organization_url: String,
}

impl Cohort {
    pub fn new(
        id: CohortId,
        name: impl Into<String>,
        slack_channel: impl Into<String>,
        student_organization_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            slack_channel: slack_channel.into(),
            student_organization_url: student_organization_url.into(),
        }
    }

    pub fn id(&self) -> CohortId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slack_channel(&self) -> &str {
        &self.slack_channel
    }

    pub fn student_organization_url(&self) -> &str {
        &self.student_organization_url
    }

    /// Last whitespace-delimited token of the cohort name ("Day Cohort 50" -> "50")
    pub fn name_token(&self) -> &str {
        self.name.split_whitespace().last().unwrap_or("")
    }

    /// GitHub organization login, taken from the last path segment of the organization URL
    pub fn organization_name(&self) -> &str {
        self.student_organization_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or("")
    }
}
