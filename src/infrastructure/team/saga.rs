//! Provisioning step log
//!
//! A team creation touches the chat provider, the source host, the database
//! and the event bus with no shared transaction. Each completed side effect is
//! recorded here so that an aborted run reports exactly what it left behind.
//! Completed steps are never undone.

use tracing::warn;

use crate::domain::project::RepositoryKind;
use crate::domain::team::{TeamId, TeamMakerError};

/// A completed provisioning side effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningStep {
    ChannelCreated { channel: String },
    TeamPersisted { team_id: TeamId },
    /// An earlier request with the same token created the team
    TeamResumed { team_id: TeamId },
    MembershipsPersisted { count: usize },
    RepositoryCreated { kind: RepositoryKind, full_name: String },
    PermissionsGranted { kind: RepositoryKind, count: usize },
    RepositoryRecorded { kind: RepositoryKind },
    ChannelNotified { kind: RepositoryKind },
    EventPublished { topic: String },
}

impl ProvisioningStep {
    /// Whether the side effect has an inverse operation (archive, delete, revoke)
    pub fn is_compensatable(&self) -> bool {
        !matches!(
            self,
            Self::TeamResumed { .. } | Self::ChannelNotified { .. } | Self::EventPublished { .. }
        )
    }
}

impl std::fmt::Display for ProvisioningStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChannelCreated { channel } => write!(f, "channel_created({})", channel),
            Self::TeamPersisted { team_id } => write!(f, "team_persisted({})", team_id),
            Self::TeamResumed { team_id } => write!(f, "team_resumed({})", team_id),
            Self::MembershipsPersisted { count } => write!(f, "memberships_persisted({})", count),
            Self::RepositoryCreated { kind, full_name } => {
                write!(f, "{}_repository_created({})", kind, full_name)
            }
            Self::PermissionsGranted { kind, count } => {
                write!(f, "{}_permissions_granted({})", kind, count)
            }
            Self::RepositoryRecorded { kind } => write!(f, "{}_repository_recorded", kind),
            Self::ChannelNotified { kind } => write!(f, "{}_channel_notified", kind),
            Self::EventPublished { topic } => write!(f, "event_published({})", topic),
        }
    }
}

/// Ordered record of the steps one team creation completed
#[derive(Debug, Default)]
pub struct SagaLog {
    steps: Vec<ProvisioningStep>,
}

impl SagaLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: ProvisioningStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[ProvisioningStep] {
        &self.steps
    }

    /// Log the side effects left in place by a failed run and hand the error back
    pub fn abort(&self, error: TeamMakerError) -> TeamMakerError {
        let completed: Vec<String> = self.steps.iter().map(|s| s.to_string()).collect();
        let compensatable = self.steps.iter().filter(|s| s.is_compensatable()).count();

        warn!(
            error = %error,
            completed = ?completed,
            compensatable,
            "Team provisioning aborted; completed steps are left in place"
        );

        error
    }
}
