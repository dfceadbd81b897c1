//! Storage factory for runtime backend selection

use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::cohort::CohortRepository;
use crate::domain::project::ProjectRepository;
use crate::domain::student::StudentRepository;
use crate::domain::team::{MembershipRepository, RepositoryRecordRepository, TeamRepository};
use crate::domain::DomainError;
use crate::infrastructure::catalog::{InMemoryCatalog, PostgresCatalog};
use crate::infrastructure::team::{InMemoryTeamStore, PostgresTeamStore};

use super::migrations::PostgresMigrator;
use super::postgres::{connect_pool, PostgresConfig};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Every repository the service needs, backed by one storage backend
#[derive(Debug, Clone)]
pub struct Stores {
    pub cohorts: Arc<dyn CohortRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub students: Arc<dyn StudentRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub repositories: Arc<dyn RepositoryRecordRepository>,
    /// Present for the PostgreSQL backend
    pub pool: Option<PgPool>,
}

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Create the stores for the configured backend; PostgreSQL schemas are migrated first
    pub async fn create(config: &StorageConfig) -> Result<Stores, DomainError> {
        match config {
            StorageConfig::InMemory => Ok(Self::in_memory()),
            StorageConfig::Postgres(pg_config) => {
                let pool = connect_pool(pg_config).await?;
                PostgresMigrator::new(pool.clone()).run().await?;
                Ok(Self::postgres(pool))
            }
        }
    }

    pub fn in_memory() -> Stores {
        let catalog = Arc::new(InMemoryCatalog::new());
        let teams = Arc::new(InMemoryTeamStore::new());

        Stores {
            cohorts: catalog.clone(),
            projects: catalog.clone(),
            students: catalog,
            teams: teams.clone(),
            memberships: teams.clone(),
            repositories: teams,
            pool: None,
        }
    }

    pub fn postgres(pool: PgPool) -> Stores {
        let catalog = Arc::new(PostgresCatalog::new(pool.clone()));
        let teams = Arc::new(PostgresTeamStore::new(pool.clone()));

        Stores {
            cohorts: catalog.clone(),
            projects: catalog.clone(),
            students: catalog,
            teams: teams.clone(),
            memberships: teams.clone(),
            repositories: teams,
            pool: Some(pool),
        }
    }
}
