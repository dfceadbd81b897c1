//! HTTP API layer
//!
//! Provides the team maker endpoints and the health probes.

pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod teammaker;
pub mod types;

pub use router::create_router;
pub use state::AppState;
