//! Schema migrations
//!
//! Applied versions are tracked in `_migrations`. Each migration runs once,
//! in ascending version order.

use sqlx::postgres::PgPool;

use crate::domain::DomainError;

/// A versioned schema change with its inverse
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: String,
    pub up: String,
    pub down: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
            down: down.into(),
        }
    }
}

/// Applies and reverts migrations against a PostgreSQL pool
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
    migrations: Vec<Migration>,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            migrations: schema_migrations(),
        }
    }

    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
            .bind(version)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check migration status: {}", e)))
    }

    /// Apply every pending migration, returning the versions applied
    pub async fn run(&self) -> Result<Vec<i64>, DomainError> {
        self.ensure_migrations_table().await?;
        let mut applied = Vec::new();

        for migration in &self.migrations {
            if self.is_applied(migration.version).await? {
                continue;
            }

            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

            sqlx::raw_sql(&migration.up)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DomainError::storage(format!(
                        "Failed to run migration {}: {}",
                        migration.version, e
                    ))
                })?;

            sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
                .bind(migration.version)
                .bind(&migration.description)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DomainError::storage(format!(
                        "Failed to record migration {}: {}",
                        migration.version, e
                    ))
                })?;

            tx.commit()
                .await
                .map_err(|e| DomainError::storage(format!("Failed to commit migration: {}", e)))?;

            tracing::info!(
                version = migration.version,
                description = %migration.description,
                "Applied migration"
            );
            applied.push(migration.version);
        }

        Ok(applied)
    }

    /// Revert the most recently applied migration, if any
    pub async fn revert_last(&self) -> Result<Option<i64>, DomainError> {
        let Some(version) = self.current_version().await? else {
            return Ok(None);
        };

        let migration = self
            .migrations
            .iter()
            .find(|m| m.version == version)
            .ok_or_else(|| {
                DomainError::storage(format!("Applied migration {} is unknown", version))
            })?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::raw_sql(&migration.down)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to revert migration {}: {}", version, e))
            })?;

        sqlx::query("DELETE FROM _migrations WHERE version = $1")
            .bind(version)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to remove migration record {}: {}",
                    version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit revert: {}", e)))?;

        tracing::info!(version, "Reverted migration");
        Ok(Some(version))
    }

    /// Latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }
}

/// Tables for reference data and team provisioning results
pub fn schema_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create reference data tables",
            r#"
            CREATE TABLE IF NOT EXISTS cohorts (
                id BIGINT PRIMARY KEY,
                name TEXT NOT NULL,
                slack_channel TEXT NOT NULL,
                student_organization_url TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS projects (
                id BIGINT PRIMARY KEY,
                name TEXT NOT NULL,
                client_template_url TEXT NOT NULL,
                api_template_url TEXT
            );
            CREATE TABLE IF NOT EXISTS students (
                id BIGINT PRIMARY KEY,
                name TEXT NOT NULL,
                github_handle TEXT NOT NULL,
                slack_handle TEXT NOT NULL,
                is_staff BOOLEAN NOT NULL DEFAULT FALSE
            );
            "#,
            r#"
            DROP TABLE IF EXISTS students;
            DROP TABLE IF EXISTS projects;
            DROP TABLE IF EXISTS cohorts;
            "#,
        ),
        Migration::new(
            2,
            "Create teams table",
            r#"
            CREATE TABLE IF NOT EXISTS teams (
                id BIGSERIAL PRIMARY KEY,
                group_name TEXT NOT NULL,
                cohort_id BIGINT NOT NULL REFERENCES cohorts(id),
                sprint_team BOOLEAN NOT NULL DEFAULT FALSE,
                slack_channel TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_teams_cohort_id ON teams(cohort_id);
            "#,
            r#"
            DROP TABLE IF EXISTS teams;
            "#,
        ),
        Migration::new(
            3,
            "Create team membership and repository tables",
            r#"
            CREATE TABLE IF NOT EXISTS team_memberships (
                id BIGSERIAL PRIMARY KEY,
                team_id BIGINT NOT NULL REFERENCES teams(id),
                student_id BIGINT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_team_memberships_team_id ON team_memberships(team_id);
            CREATE TABLE IF NOT EXISTS team_repositories (
                id BIGSERIAL PRIMARY KEY,
                team_id BIGINT NOT NULL REFERENCES teams(id),
                project_id BIGINT NOT NULL REFERENCES projects(id),
                repository TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_team_repositories_team_id ON team_repositories(team_id);
            "#,
            r#"
            DROP TABLE IF EXISTS team_repositories;
            DROP TABLE IF EXISTS team_memberships;
            "#,
        ),
        Migration::new(
            4,
            "Add team request tokens",
            r#"
            ALTER TABLE teams ADD COLUMN IF NOT EXISTS request_token TEXT;
            CREATE UNIQUE INDEX IF NOT EXISTS idx_teams_cohort_request_token
                ON teams(cohort_id, request_token)
                WHERE request_token IS NOT NULL;
            "#,
            r#"
            DROP INDEX IF EXISTS idx_teams_cohort_request_token;
            ALTER TABLE teams DROP COLUMN IF EXISTS request_token;
            "#,
        ),
    ]
}
