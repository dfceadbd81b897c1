//! Team maker: forms teams and provisions their channel and repositories

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, info, warn};

use super::saga::{ProvisioningStep, SagaLog};
use crate::domain::cohort::{Cohort, CohortId, CohortRepository};
use crate::domain::project::{Project, ProjectId, ProjectRepository, RepositoryKind};
use crate::domain::provider::{
    ChatProvider, EventPublisher, RepositoryCreation, RepositoryRequest, SourceHostProvider,
};
use crate::domain::student::{Student, StudentId, StudentRepository};
use crate::domain::team::naming::{self, SuffixSource};
use crate::domain::team::{
    MembershipRepository, NewTeam, RepositoryRecordRepository, Team, TeamDetails, TeamMakerError,
    TeamRepository,
};

/// Topic subscribed to by the issue ticket migration worker
pub const DEFAULT_EVENT_TOPIC: &str = "channel_migrate_issue_tickets";

/// Request for creating a team
#[derive(Debug, Clone, Default)]
pub struct CreateTeamRequest {
    /// `None` when the caller sent no usable cohort identifier
    pub cohort: Option<CohortId>,
    /// Ordered; one membership is stored per entry
    pub students: Vec<StudentId>,
    pub group_project: Option<ProjectId>,
    pub weekly_prefix: String,
    /// Makes generated names deterministic so a retried request reuses them
    pub request_token: Option<String>,
}

/// Counts of what a reset removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetSummary {
    pub channels_deleted: usize,
    pub channel_failures: usize,
    pub memberships: u64,
    pub repositories: u64,
    pub teams: u64,
}

#[derive(Debug, Clone)]
pub struct TeamMakerSettings {
    pub event_topic: String,
    /// Browser base URL used to build stored repository links
    pub repository_web_url: String,
}

impl Default for TeamMakerSettings {
    fn default() -> Self {
        Self {
            event_topic: DEFAULT_EVENT_TOPIC.to_string(),
            repository_web_url: "https://github.com".to_string(),
        }
    }
}

/// Stores and providers the team maker works with
#[derive(Debug, Clone)]
pub struct TeamMakerDependencies {
    pub cohorts: Arc<dyn CohortRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub students: Arc<dyn StudentRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub repositories: Arc<dyn RepositoryRecordRepository>,
    pub chat: Arc<dyn ChatProvider>,
    pub source_host: Arc<dyn SourceHostProvider>,
    pub events: Arc<dyn EventPublisher>,
}

/// Orchestrates team creation, listing and teardown
///
/// Steps of one operation run strictly in sequence. Side effects completed
/// before a failure stay in place.
#[derive(Debug)]
pub struct TeamMakerService {
    deps: TeamMakerDependencies,
    settings: TeamMakerSettings,
}

impl TeamMakerService {
    pub fn new(deps: TeamMakerDependencies) -> Self {
        Self {
            deps,
            settings: TeamMakerSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: TeamMakerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &TeamMakerSettings {
        &self.settings
    }

    /// Create a team, its chat channel and, for group projects, its repositories
    pub async fn create(&self, request: CreateTeamRequest) -> Result<TeamDetails, TeamMakerError> {
        let cohort = match request.cohort {
            Some(id) => self.deps.cohorts.get(id).await?,
            None => None,
        };
        let Some(cohort) = cohort else {
            warn!(cohort_id = ?request.cohort, "Failed to get cohort");
            return Err(TeamMakerError::InvalidCohort);
        };

        let mut saga = SagaLog::new();
        let team = match self.provision(&request, &cohort, &mut saga).await {
            Ok(team) => team,
            Err(e) => return Err(saga.abort(e)),
        };

        info!(team_id = %team.id(), steps = saga.steps().len(), "Team created");
        self.details(team).await
    }

    /// Teams of a cohort, newest first
    pub async fn list(&self, cohort: Option<&str>) -> Result<Vec<TeamDetails>, TeamMakerError> {
        let Some(cohort) = self.find_cohort(cohort).await? else {
            warn!(cohort = ?cohort, "Cohort not found");
            return Err(TeamMakerError::CohortNotFound);
        };

        let teams = self.deps.teams.list_by_cohort(cohort.id()).await?;
        let mut details = Vec::with_capacity(teams.len());

        for team in teams {
            details.push(self.details(team).await?);
        }

        debug!(cohort_id = %cohort.id(), teams = details.len(), "Listed teams");
        Ok(details)
    }

    /// Remove every team of a cohort along with its channels
    pub async fn reset(&self, cohort: Option<&str>) -> Result<ResetSummary, TeamMakerError> {
        if cohort.map(str::trim).is_none_or(str::is_empty) {
            warn!("No cohort ID provided in reset request");
            return Err(TeamMakerError::MissingCohort);
        }

        let Some(cohort) = self.find_cohort(cohort).await? else {
            warn!(cohort = ?cohort, "Cohort not found during reset");
            return Err(TeamMakerError::CohortNotFound);
        };

        let mut summary = ResetSummary::default();
        let teams = self.deps.teams.list_by_cohort(cohort.id()).await?;

        // Channels go first, while the stored channel identifiers still exist
        for team in &teams {
            let Some(channel) = team.slack_channel() else {
                continue;
            };

            match self.deps.chat.delete_channel(channel).await {
                Ok(()) => {
                    summary.channels_deleted += 1;
                    debug!(team_id = %team.id(), channel, "Chat channel deleted");
                }
                Err(e) => {
                    summary.channel_failures += 1;
                    warn!(team_id = %team.id(), channel, error = %e, "Failed to delete chat channel");
                }
            }
        }

        summary.memberships = self.deps.memberships.delete_by_cohort(cohort.id()).await?;
        summary.repositories = self.deps.repositories.delete_by_cohort(cohort.id()).await?;
        summary.teams = self.deps.teams.delete_by_cohort(cohort.id()).await?;

        info!(
            cohort_id = %cohort.id(),
            channels_deleted = summary.channels_deleted,
            channel_failures = summary.channel_failures,
            memberships = summary.memberships,
            repositories = summary.repositories,
            teams = summary.teams,
            "Cohort teams reset"
        );

        Ok(summary)
    }

    async fn find_cohort(&self, raw: Option<&str>) -> Result<Option<Cohort>, TeamMakerError> {
        match raw.and_then(CohortId::parse) {
            Some(id) => Ok(self.deps.cohorts.get(id).await?),
            None => Ok(None),
        }
    }

    async fn details(&self, team: Team) -> Result<TeamDetails, TeamMakerError> {
        let memberships = self.deps.memberships.list_by_team(team.id()).await?;
        let student_ids: Vec<StudentId> = memberships.iter().map(|m| m.student_id()).collect();
        let students = self.deps.students.get_many(&student_ids).await?;
        let repositories = self.deps.repositories.list_by_team(team.id()).await?;

        Ok(TeamDetails {
            team,
            memberships,
            students,
            repositories,
        })
    }

    async fn provision(
        &self,
        request: &CreateTeamRequest,
        cohort: &Cohort,
        saga: &mut SagaLog,
    ) -> Result<Team, TeamMakerError> {
        let suffixes = SuffixSource::from_token(request.request_token.as_deref());

        // Unknown IDs still get a membership row but no invite or grant
        let members = self.deps.students.get_many(&request.students).await?;

        let earlier = match request.request_token.as_deref() {
            Some(token) => {
                self.deps
                    .teams
                    .find_by_request_token(cohort.id(), token)
                    .await?
            }
            None => None,
        };
        let resuming = earlier.is_some();

        let (team, channel) = match earlier {
            Some(team) => self.resume_team(team, request, saga).await?,
            None => {
                self.open_team(request, cohort, &suffixes, &members, saga)
                    .await?
            }
        };

        let Some(project_id) = request.group_project else {
            return Ok(team);
        };

        let Some(project) = self.deps.projects.get(project_id).await? else {
            warn!(project_id = %project_id, team_id = %team.id(), "Failed to get project");
            return Err(TeamMakerError::InvalidProject);
        };

        let organization = cohort.organization_name();
        let recorded: Vec<String> = if resuming {
            self.deps
                .repositories
                .list_by_team(team.id())
                .await?
                .iter()
                .map(|r| r.repository().to_string())
                .collect()
        } else {
            Vec::new()
        };
        let mut target_repositories = Vec::new();
        let mut provisioned = 0;

        for kind in project.repository_kinds() {
            let Some(template_url) = project.template_url(kind) else {
                continue;
            };
            let repo_name =
                naming::repository_name(&project.slug(), kind, &suffixes.suffix(kind.as_str()));
            let full_name = format!("{}/{}", organization, repo_name);
            let url = format!(
                "{}/{}",
                self.settings.repository_web_url.trim_end_matches('/'),
                full_name
            );

            if recorded.contains(&url) {
                debug!(kind = %kind, repository = %url, "Repository already provisioned");
                target_repositories.push(full_name);
                continue;
            }

            let exists = resuming
                && self
                    .deps
                    .source_host
                    .repository_exists(organization, &repo_name)
                    .await
                    .map_err(|e| {
                        error!(kind = %kind, repo_name = %repo_name, error = %e, "Failed to look up repository");
                        TeamMakerError::RepositoryProvisionFailure { kind }
                    })?;

            if exists {
                info!(kind = %kind, repo_name = %repo_name, "Repository left by an earlier request");
            } else {
                info!(kind = %kind, repo_name = %repo_name, "Creating repository");

                let creation = self
                    .deps
                    .source_host
                    .create_repository(RepositoryRequest {
                        template_url,
                        organization_url: cohort.student_organization_url(),
                        name: &repo_name,
                        project_name: project.name(),
                    })
                    .await;

                match creation {
                    Ok(RepositoryCreation::Created) => {}
                    Ok(RepositoryCreation::Rejected { status }) => {
                        error!(kind = %kind, repo_name = %repo_name, status, "Failed to create repository");
                        return Err(TeamMakerError::RepositoryProvisionFailure { kind });
                    }
                    Err(e) => {
                        error!(kind = %kind, repo_name = %repo_name, error = %e, "Failed to create repository");
                        return Err(TeamMakerError::RepositoryProvisionFailure { kind });
                    }
                }

                saga.record(ProvisioningStep::RepositoryCreated {
                    kind,
                    full_name: full_name.clone(),
                });
            }

            for student in &members {
                self.deps
                    .source_host
                    .assign_permission(organization, &repo_name, student)
                    .await
                    .map_err(|e| {
                        error!(
                            kind = %kind,
                            repo_name = %repo_name,
                            student_id = %student.id(),
                            error = %e,
                            "Failed to grant repository access"
                        );
                        TeamMakerError::PermissionGrantFailure {
                            kind,
                            student: student.github_handle().to_string(),
                            message: e.to_string(),
                        }
                    })?;
                debug!(kind = %kind, student_id = %student.id(), repo_name = %repo_name, "Permissions granted");
            }
            saga.record(ProvisioningStep::PermissionsGranted {
                kind,
                count: members.len(),
            });

            self.deps
                .repositories
                .create(team.id(), project.id(), &url)
                .await?;
            saga.record(ProvisioningStep::RepositoryRecorded { kind });
            info!(kind = %kind, repository = %url, "Repository saved");

            target_repositories.push(full_name);
            provisioned += 1;

            self.deps
                .chat
                .send_message(&repository_message(kind, &url), &channel)
                .await
                .map_err(|e| {
                    error!(kind = %kind, channel = %channel, error = %e, "Failed to notify team channel");
                    TeamMakerError::ChannelNotificationFailure(e.to_string())
                })?;
            saga.record(ProvisioningStep::ChannelNotified { kind });
        }

        // A retry of a completed request must not migrate the tickets twice
        if resuming && provisioned == 0 {
            debug!(team_id = %team.id(), "Every repository already provisioned");
            return Ok(team);
        }

        self.publish_migration(cohort, &project, &target_repositories, saga)
            .await;

        Ok(team)
    }

    /// Create the chat channel, then the team row and its memberships
    async fn open_team(
        &self,
        request: &CreateTeamRequest,
        cohort: &Cohort,
        suffixes: &SuffixSource,
        members: &[Student],
        saga: &mut SagaLog,
    ) -> Result<(Team, String), TeamMakerError> {
        let channel_name = naming::channel_name(
            &request.weekly_prefix,
            cohort.name_token(),
            &suffixes.suffix("channel"),
        );

        info!(
            cohort_id = %cohort.id(),
            channel_name = %channel_name,
            requested = request.students.len(),
            resolved = members.len(),
            sprint_team = request.group_project.is_some(),
            "Creating team"
        );

        let channel = self
            .deps
            .chat
            .create_channel(&channel_name, members)
            .await
            .map_err(|e| {
                error!(channel_name = %channel_name, error = %e, "Failed to create chat channel");
                TeamMakerError::ChannelProvisionFailure(e.to_string())
            })?;
        saga.record(ProvisioningStep::ChannelCreated {
            channel: channel.clone(),
        });
        info!(channel = %channel, provider = self.deps.chat.provider_name(), "Chat channel created");

        let team = self
            .deps
            .teams
            .create(NewTeam {
                group_name: channel_name,
                cohort_id: cohort.id(),
                sprint_team: request.group_project.is_some(),
                slack_channel: Some(channel.clone()),
                request_token: request.request_token.clone(),
            })
            .await?;
        saga.record(ProvisioningStep::TeamPersisted { team_id: team.id() });
        info!(team_id = %team.id(), "Team saved");

        for student_id in &request.students {
            self.deps.memberships.create(team.id(), *student_id).await?;
            debug!(team_id = %team.id(), student_id = %student_id, "Student added to team");
        }
        saga.record(ProvisioningStep::MembershipsPersisted {
            count: request.students.len(),
        });

        Ok((team, channel))
    }

    /// Pick up a team an earlier request with the same token left behind.
    /// Its channel is reused and only missing memberships are added.
    async fn resume_team(
        &self,
        team: Team,
        request: &CreateTeamRequest,
        saga: &mut SagaLog,
    ) -> Result<(Team, String), TeamMakerError> {
        let Some(channel) = team.slack_channel().map(str::to_string) else {
            return Err(TeamMakerError::ChannelProvisionFailure(format!(
                "Team {} has no chat channel",
                team.id()
            )));
        };
        saga.record(ProvisioningStep::TeamResumed { team_id: team.id() });
        info!(team_id = %team.id(), channel = %channel, "Resuming team of an earlier request");

        let mut stored: Vec<StudentId> = self
            .deps
            .memberships
            .list_by_team(team.id())
            .await?
            .iter()
            .map(|m| m.student_id())
            .collect();
        let mut added = 0;

        for student_id in &request.students {
            if let Some(position) = stored.iter().position(|id| id == student_id) {
                stored.swap_remove(position);
                continue;
            }
            self.deps.memberships.create(team.id(), *student_id).await?;
            added += 1;
        }
        if added > 0 {
            saga.record(ProvisioningStep::MembershipsPersisted { count: added });
        }

        Ok((team, channel))
    }

    /// Ask the migration worker to copy template issues into the new repositories.
    /// A failed publish costs the team its issue tickets and nothing else.
    async fn publish_migration(
        &self,
        cohort: &Cohort,
        project: &Project,
        target_repositories: &[String],
        saga: &mut SagaLog,
    ) {
        let topic = self.settings.event_topic.as_str();
        let payload = json!({
            "notification_channel": cohort.slack_channel(),
            "source_repo": project.source_repo(),
            "all_target_repositories": target_repositories,
        })
        .to_string();

        match self.deps.events.publish(topic, &payload).await {
            Ok(()) => {
                saga.record(ProvisioningStep::EventPublished {
                    topic: topic.to_string(),
                });
                info!(topic, payload = %payload, "Published issue migration event");
            }
            Err(e) => {
                error!(topic, payload = %payload, error = %e, "Failed to publish issue migration event");
            }
        }
    }
}

fn repository_message(kind: RepositoryKind, url: &str) -> String {
    format!(
        "🐙 Your {} repository has been created. Visit the URL below and clone the project to your machine.\n\n{}",
        kind, url
    )
}
