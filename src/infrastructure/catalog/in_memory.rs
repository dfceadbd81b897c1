//! In-memory reference data

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::cohort::{Cohort, CohortId, CohortRepository};
use crate::domain::project::{Project, ProjectId, ProjectRepository};
use crate::domain::student::{Student, StudentId, StudentRepository};
use crate::domain::DomainError;

/// In-memory implementation of the cohort, project and student repositories
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    cohorts: Arc<RwLock<HashMap<CohortId, Cohort>>>,
    projects: Arc<RwLock<HashMap<ProjectId, Project>>>,
    students: Arc<RwLock<HashMap<StudentId, Student>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with initial data
    pub fn with_data(cohorts: Vec<Cohort>, projects: Vec<Project>, students: Vec<Student>) -> Self {
        Self {
            cohorts: Arc::new(RwLock::new(
                cohorts.into_iter().map(|c| (c.id(), c)).collect(),
            )),
            projects: Arc::new(RwLock::new(
                projects.into_iter().map(|p| (p.id(), p)).collect(),
            )),
            students: Arc::new(RwLock::new(
                students.into_iter().map(|s| (s.id(), s)).collect(),
            )),
        }
    }
}

#[async_trait]
impl CohortRepository for InMemoryCatalog {
    async fn get(&self, id: CohortId) -> Result<Option<Cohort>, DomainError> {
        Ok(self.cohorts.read().await.get(&id).cloned())
    }

    async fn save(&self, cohort: Cohort) -> Result<Cohort, DomainError> {
        self.cohorts.write().await.insert(cohort.id(), cohort.clone());
        Ok(cohort)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.cohorts.read().await.len())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryCatalog {
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, DomainError> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn save(&self, project: Project) -> Result<Project, DomainError> {
        self.projects
            .write()
            .await
            .insert(project.id(), project.clone());
        Ok(project)
    }
}

#[async_trait]
impl StudentRepository for InMemoryCatalog {
    async fn get_many(&self, ids: &[StudentId]) -> Result<Vec<Student>, DomainError> {
        let students = self.students.read().await;
        let mut seen = HashSet::new();

        Ok(ids
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| students.get(id).cloned())
            .collect())
    }

    async fn save(&self, student: Student) -> Result<Student, DomainError> {
        self.students
            .write()
            .await
            .insert(student.id(), student.clone());
        Ok(student)
    }
}
