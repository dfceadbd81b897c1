//! Application state for shared services

use std::sync::Arc;

use crate::domain::CohortRepository;
use crate::infrastructure::team::TeamMakerService;

/// Application state handed to every handler
#[derive(Clone, Debug)]
pub struct AppState {
    pub team_maker: Arc<TeamMakerService>,
    /// Used by the readiness probe to verify storage is reachable
    pub cohorts: Arc<dyn CohortRepository>,
}

impl AppState {
    pub fn new(team_maker: Arc<TeamMakerService>, cohorts: Arc<dyn CohortRepository>) -> Self {
        Self {
            team_maker,
            cohorts,
        }
    }
}
