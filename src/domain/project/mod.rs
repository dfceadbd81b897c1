//! Project domain module

mod entity;
mod repository;

pub use entity::{Project, ProjectId, RepositoryKind};
pub use repository::ProjectRepository;
