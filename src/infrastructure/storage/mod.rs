//! Storage infrastructure - backend selection, pooling and schema

mod factory;
pub mod migrations;
mod postgres;

pub use factory::{StorageConfig, StorageFactory, StorageType, Stores};
pub use migrations::{schema_migrations, Migration, PostgresMigrator};
pub use postgres::{connect_pool, PostgresConfig};
