//! Cohort domain module

mod entity;
mod repository;

pub use entity::{Cohort, CohortId};
pub use repository::CohortRepository;
