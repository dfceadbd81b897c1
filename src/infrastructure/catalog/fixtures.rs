//! JSON fixture loading for reference data
//!
//! The file holds three arrays:
//!
//! ```json
//! {
//!   "cohorts": [{"id": 1, "name": "Day Cohort 50", "slack_channel": "C01", "student_organization_url": "https://github.com/nss-50"}],
//!   "projects": [{"id": 1, "name": "Kennels", "client_template_url": "https://github.com/tpl/kennels"}],
//!   "students": [{"id": 1, "name": "Ada", "github_handle": "ada", "slack_handle": "U01"}]
//! }
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::domain::cohort::{Cohort, CohortRepository};
use crate::domain::project::{Project, ProjectRepository};
use crate::domain::student::{Student, StudentRepository};
use crate::domain::DomainError;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogFixtures {
    #[serde(default)]
    pub cohorts: Vec<Cohort>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub students: Vec<Student>,
}

impl CatalogFixtures {
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        serde_json::from_str(json)
            .map_err(|e| DomainError::configuration(format!("Invalid fixtures: {}", e)))
    }
}

/// Number of records loaded per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixtureCounts {
    pub cohorts: usize,
    pub projects: usize,
    pub students: usize,
}

/// Load a fixtures file into the given repositories, replacing records with the same ID
pub async fn load_fixtures(
    path: &Path,
    cohorts: &dyn CohortRepository,
    projects: &dyn ProjectRepository,
    students: &dyn StudentRepository,
) -> Result<FixtureCounts, DomainError> {
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        DomainError::configuration(format!(
            "Failed to read fixtures '{}': {}",
            path.display(),
            e
        ))
    })?;

    let fixtures = CatalogFixtures::from_json(&json)?;
    let counts = FixtureCounts {
        cohorts: fixtures.cohorts.len(),
        projects: fixtures.projects.len(),
        students: fixtures.students.len(),
    };

    for cohort in fixtures.cohorts {
        cohorts.save(cohort).await?;
    }
    for project in fixtures.projects {
        projects.save(project).await?;
    }
    for student in fixtures.students {
        students.save(student).await?;
    }

    tracing::info!(
        path = %path.display(),
        cohorts = counts.cohorts,
        projects = counts.projects,
        students = counts.students,
        "Loaded reference data fixtures"
    );

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cohort::CohortId;
    use crate::domain::student::StudentId;
    use crate::infrastructure::catalog::InMemoryCatalog;

    const FIXTURES: &str = r#"{
        "cohorts": [
            {"id": 1, "name": "Day Cohort 50", "slack_channel": "C01", "student_organization_url": "https://github.com/nss-50"}
        ],
        "projects": [
            {"id": 4, "name": "Honey Rae", "client_template_url": "https://github.com/tpl/honey", "api_template_url": "https://github.com/tpl/honey-api"}
        ],
        "students": [
            {"id": 7, "name": "Ada", "github_handle": "ada", "slack_handle": "U07"},
            {"id": 8, "name": "Coach", "github_handle": "coach", "slack_handle": "U08", "is_staff": true}
        ]
    }"#;

    #[test]
    fn test_parse_fixtures() {
        let fixtures = CatalogFixtures::from_json(FIXTURES).unwrap();

        assert_eq!(fixtures.cohorts.len(), 1);
        assert!(fixtures.projects[0].api_template_url().is_some());
        assert!(fixtures.students[1].is_staff());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let fixtures = CatalogFixtures::from_json(r#"{"cohorts": []}"#).unwrap();
        assert!(fixtures.students.is_empty());
    }

    #[test]
    fn test_invalid_fixtures_rejected() {
        let result = CatalogFixtures::from_json("{not json");
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_load_fixtures_from_file() {
        let path = std::env::temp_dir().join(format!("team-maker-fixtures-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, FIXTURES).await.unwrap();

        let catalog = InMemoryCatalog::new();
        let counts = load_fixtures(&path, &catalog, &catalog, &catalog).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(
            counts,
            FixtureCounts {
                cohorts: 1,
                projects: 1,
                students: 2
            }
        );
        assert!(CohortRepository::get(&catalog, CohortId::new(1))
            .await
            .unwrap()
            .is_some());
        assert_eq!(
            catalog
                .get_many(&[StudentId::new(7), StudentId::new(8)])
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let catalog = InMemoryCatalog::new();
        let result = load_fixtures(
            Path::new("/nonexistent/fixtures.json"),
            &catalog,
            &catalog,
            &catalog,
        )
        .await;

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
