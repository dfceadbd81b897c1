//! PostgreSQL reference data

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;

use crate::domain::cohort::{Cohort, CohortId, CohortRepository};
use crate::domain::project::{Project, ProjectId, ProjectRepository};
use crate::domain::student::{Student, StudentId, StudentRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of the cohort, project and student repositories
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CohortRepository for PostgresCatalog {
    async fn get(&self, id: CohortId) -> Result<Option<Cohort>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, slack_channel, student_organization_url
            FROM cohorts
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get cohort: {}", e)))?;

        Ok(row.map(|row| {
            Cohort::new(
                CohortId::new(row.get("id")),
                row.get::<String, _>("name"),
                row.get::<String, _>("slack_channel"),
                row.get::<String, _>("student_organization_url"),
            )
        }))
    }

    async fn save(&self, cohort: Cohort) -> Result<Cohort, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO cohorts (id, name, slack_channel, student_organization_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                slack_channel = EXCLUDED.slack_channel,
                student_organization_url = EXCLUDED.student_organization_url
            "#,
        )
        .bind(cohort.id().value())
        .bind(cohort.name())
        .bind(cohort.slack_channel())
        .bind(cohort.student_organization_url())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to save cohort: {}", e)))?;

        Ok(cohort)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cohorts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count cohorts: {}", e)))?;

        Ok(count as usize)
    }
}

#[async_trait]
impl ProjectRepository for PostgresCatalog {
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, client_template_url, api_template_url
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get project: {}", e)))?;

        Ok(row.map(|row| {
            let project = Project::new(
                ProjectId::new(row.get("id")),
                row.get::<String, _>("name"),
                row.get::<String, _>("client_template_url"),
            );

            match row.get::<Option<String>, _>("api_template_url") {
                Some(url) => project.with_api_template(url),
                None => project,
            }
        }))
    }

    async fn save(&self, project: Project) -> Result<Project, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, name, client_template_url, api_template_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                client_template_url = EXCLUDED.client_template_url,
                api_template_url = EXCLUDED.api_template_url
            "#,
        )
        .bind(project.id().value())
        .bind(project.name())
        .bind(project.client_template_url())
        .bind(project.api_template_url())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to save project: {}", e)))?;

        Ok(project)
    }
}

#[async_trait]
impl StudentRepository for PostgresCatalog {
    async fn get_many(&self, ids: &[StudentId]) -> Result<Vec<Student>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw_ids: Vec<i64> = ids.iter().map(|id| id.value()).collect();
        let rows = sqlx::query(
            r#"
            SELECT id, name, github_handle, slack_handle, is_staff
            FROM students
            WHERE id = ANY($1)
            "#,
        )
        .bind(&raw_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get students: {}", e)))?;

        let mut found: HashMap<StudentId, Student> = rows
            .iter()
            .map(|row| {
                let student = Student::new(
                    StudentId::new(row.get("id")),
                    row.get::<String, _>("name"),
                    row.get::<String, _>("github_handle"),
                    row.get::<String, _>("slack_handle"),
                );
                let student = if row.get::<bool, _>("is_staff") {
                    student.staff()
                } else {
                    student
                };
                (student.id(), student)
            })
            .collect();

        // Preserve caller order; a repeated ID yields the student once
        Ok(ids.iter().filter_map(|id| found.remove(id)).collect())
    }

    async fn save(&self, student: Student) -> Result<Student, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO students (id, name, github_handle, slack_handle, is_staff)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                github_handle = EXCLUDED.github_handle,
                slack_handle = EXCLUDED.slack_handle,
                is_staff = EXCLUDED.is_staff
            "#,
        )
        .bind(student.id().value())
        .bind(student.name())
        .bind(student.github_handle())
        .bind(student.slack_handle())
        .bind(student.is_staff())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to save student: {}", e)))?;

        Ok(student)
    }
}
