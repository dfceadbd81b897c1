//! Cohort repository trait

use async_trait::async_trait;

use super::entity::{Cohort, CohortId};
use crate::domain::DomainError;

/// Read access to cohorts, plus upsert for loading reference data
#[async_trait]
pub trait CohortRepository: Send + Sync + std::fmt::Debug {
    /// Get a cohort by ID
    async fn get(&self, id: CohortId) -> Result<Option<Cohort>, DomainError>;

    /// Insert or replace a cohort
    async fn save(&self, cohort: Cohort) -> Result<Cohort, DomainError>;

    /// Count cohorts
    async fn count(&self) -> Result<usize, DomainError>;
}
