//! GitHub REST API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::debug;

use crate::domain::provider::{RepositoryCreation, RepositoryRequest, SourceHostProvider};
use crate::domain::student::Student;
use crate::domain::DomainError;

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// REST API base URL, e.g. `https://api.github.com`
    pub api_url: String,
    /// Personal access or installation token
    pub token: String,
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token: String::new(),
            timeout_secs: 30,
        }
    }
}

impl GithubConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// Source host backed by the GitHub REST API
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    config: GithubConfig,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Result<Self, DomainError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }
}

/// `owner/repo` from a repository browser URL
fn owner_and_repo(url: &str) -> Option<(&str, &str)> {
    let mut segments = url.trim_end_matches('/').rsplit('/');
    let repo = segments.next().filter(|s| !s.is_empty())?;
    let owner = segments.next().filter(|s| !s.is_empty() && !s.contains(':'))?;
    Some((owner, repo))
}

/// Organization login from an organization browser URL
fn organization_login(url: &str) -> Option<&str> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
}

#[async_trait]
impl SourceHostProvider for GithubClient {
    async fn create_repository(
        &self,
        request: RepositoryRequest<'_>,
    ) -> Result<RepositoryCreation, DomainError> {
        let (template_owner, template_repo) =
            owner_and_repo(request.template_url).ok_or_else(|| {
                DomainError::validation(format!("Invalid template URL '{}'", request.template_url))
            })?;
        let owner = organization_login(request.organization_url).ok_or_else(|| {
            DomainError::validation(format!(
                "Invalid organization URL '{}'",
                request.organization_url
            ))
        })?;

        let url = self.endpoint(&format!(
            "/repos/{}/{}/generate",
            template_owner, template_repo
        ));

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header(USER_AGENT, "team-maker")
            .json(&json!({
                "owner": owner,
                "name": request.name,
                "description": format!("Group project repository for {}", request.project_name),
                "private": false,
                "include_all_branches": false,
            }))
            .send()
            .await
            .map_err(|e| DomainError::provider("github", format!("Repository creation failed: {}", e)))?;

        let status = response.status().as_u16();
        debug!(owner, name = request.name, status, "Repository generate response");

        Ok(RepositoryCreation::from_status(status))
    }

    async fn repository_exists(
        &self,
        organization: &str,
        repository: &str,
    ) -> Result<bool, DomainError> {
        let url = self.endpoint(&format!("/repos/{}/{}", organization, repository));

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.token)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header(USER_AGENT, "team-maker")
            .send()
            .await
            .map_err(|e| DomainError::provider("github", format!("Repository lookup failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(DomainError::provider(
                "github",
                format!("Repository lookup returned HTTP {}", status),
            )),
        }
    }

    async fn assign_permission(
        &self,
        organization: &str,
        repository: &str,
        student: &Student,
    ) -> Result<(), DomainError> {
        let url = self.endpoint(&format!(
            "/repos/{}/{}/collaborators/{}",
            organization,
            repository,
            student.github_handle()
        ));

        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.config.token)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header(USER_AGENT, "team-maker")
            .json(&json!({ "permission": "push" }))
            .send()
            .await
            .map_err(|e| DomainError::provider("github", format!("Permission grant failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::provider(
                "github",
                format!("Permission grant returned HTTP {}: {}", status, body),
            ));
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "github"
    }
}
