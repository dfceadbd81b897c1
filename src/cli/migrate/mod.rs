//! Migrate command - applies the PostgreSQL schema

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::storage::{connect_pool, PostgresMigrator, StorageConfig};

#[derive(Args, Debug, Clone, Default)]
pub struct MigrateArgs {
    /// Revert the most recently applied migration instead
    #[arg(long)]
    pub revert: bool,
}

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    let StorageConfig::Postgres(pg_config) = config.storage.to_storage_config()? else {
        anyhow::bail!("Migrations require the postgres storage backend");
    };

    let pool = connect_pool(&pg_config).await?;
    let migrator = PostgresMigrator::new(pool);

    if args.revert {
        match migrator.revert_last().await? {
            Some(version) => info!(version, "Reverted migration"),
            None => info!("No migrations to revert"),
        }
        return Ok(());
    }

    let applied = migrator.run().await?;
    let current = migrator.current_version().await?;

    info!(applied = ?applied, current = ?current, "Migrations complete");

    Ok(())
}
