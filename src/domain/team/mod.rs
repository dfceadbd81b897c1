//! Team domain module
//!
//! A team is formed inside one cohort. Its chat channel and repositories are
//! provisioned by the team maker; memberships and repository records hang off
//! the team and are removed with it.

mod entity;
mod error;
pub mod naming;
mod repository;

pub use entity::{
    Membership, MembershipId, NewTeam, RepositoryRecord, RepositoryRecordId, Team, TeamDetails,
    TeamId,
};
pub use error::TeamMakerError;
pub use repository::{MembershipRepository, RepositoryRecordRepository, TeamRepository};

#[cfg(test)]
pub use repository::mock;
