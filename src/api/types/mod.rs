//! Request and response types shared by the handlers

pub mod error;
pub mod json;
pub mod team;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use team::{
    CohortParams, CreateTeamBody, RepositoryResponse, TeamResponse, TeamStudentResponse,
};
