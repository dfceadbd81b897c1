//! Project entity and repository kinds

use serde::{Deserialize, Serialize};

/// Project identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(i64);

impl ProjectId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of repository created for a group project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryKind {
    /// Primary repository, always created from the client template
    Client,
    /// Secondary repository, created only when the project has an API template
    Api,
}

impl RepositoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Api => "api",
        }
    }
}

impl std::fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A course project that may be built by a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    client_template_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_template_url: Option<String>,
}

impl Project {
    pub fn new(id: ProjectId, name: impl Into<String>, client_template_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            client_template_url: client_template_url.into(),
            api_template_url: None,
        }
    }

    /// Set the API template (builder pattern)
    pub fn with_api_template(mut self, url: impl Into<String>) -> Self {
        self.api_template_url = Some(url.into());
        self
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn client_template_url(&self) -> &str {
        &self.client_template_url
    }

    pub fn api_template_url(&self) -> Option<&str> {
        self.api_template_url.as_deref()
    }

    /// Repository kinds to provision, primary first
    pub fn repository_kinds(&self) -> Vec<RepositoryKind> {
        if self.api_template_url.is_some() {
            vec![RepositoryKind::Client, RepositoryKind::Api]
        } else {
            vec![RepositoryKind::Client]
        }
    }

    pub fn template_url(&self, kind: RepositoryKind) -> Option<&str> {
        match kind {
            RepositoryKind::Client => Some(&self.client_template_url),
            RepositoryKind::Api => self.api_template_url.as_deref(),
        }
    }

    /// Project name with spaces replaced by hyphens, used as a repository name stem
    pub fn slug(&self) -> String {
        self.name.replace(' ', "-")
    }

    /// `owner/repo` path of the client template
    pub fn source_repo(&self) -> String {
        let segments: Vec<&str> = self
            .client_template_url
            .trim_end_matches('/')
            .rsplit('/')
            .take(2)
            .collect();

        segments.into_iter().rev().collect::<Vec<_>>().join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        Project::new(
            ProjectId::new(3),
            "Test Group Project",
            "https://github.com/templates/client-template",
        )
    }

    #[test]
    fn test_repository_kinds_client_only() {
        assert_eq!(project().repository_kinds(), vec![RepositoryKind::Client]);
    }

    #[test]
    fn test_repository_kinds_with_api() {
        let project = project().with_api_template("https://github.com/templates/api-template");

        assert_eq!(
            project.repository_kinds(),
            vec![RepositoryKind::Client, RepositoryKind::Api]
        );
        assert_eq!(
            project.template_url(RepositoryKind::Api),
            Some("https://github.com/templates/api-template")
        );
    }

    #[test]
    fn test_slug() {
        assert_eq!(project().slug(), "Test-Group-Project");
    }

    #[test]
    fn test_source_repo() {
        assert_eq!(project().source_repo(), "templates/client-template");
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(RepositoryKind::Client.to_string(), "client");
        assert_eq!(RepositoryKind::Api.to_string(), "api");
    }
}
