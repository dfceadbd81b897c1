//! Reference data: cohorts, projects and students

mod fixtures;
mod in_memory;
mod postgres;

pub use fixtures::{load_fixtures, CatalogFixtures, FixtureCounts};
pub use in_memory::InMemoryCatalog;
pub use postgres::PostgresCatalog;
