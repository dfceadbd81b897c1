//! Student domain module

mod entity;
mod repository;

pub use entity::{Student, StudentId};
pub use repository::StudentRepository;
