//! Student repository trait

use async_trait::async_trait;

use super::entity::{Student, StudentId};
use crate::domain::DomainError;

#[async_trait]
pub trait StudentRepository: Send + Sync + std::fmt::Debug {
    /// Fetch the students that exist among `ids`, preserving the order of `ids`.
    /// Unknown IDs are skipped.
    async fn get_many(&self, ids: &[StudentId]) -> Result<Vec<Student>, DomainError>;

    /// Insert or replace a student
    async fn save(&self, student: Student) -> Result<Student, DomainError>;
}
