//! fleet-server: axum service exposing fleet predictions over a PostgreSQL store.

pub mod api;
pub mod db;
pub mod repository;
pub mod router;
pub mod state;

pub use repository::{FleetData, FleetRepository, InMemoryFleetRepository, PgFleetRepository, RepositoryError};
pub use router::build_router;
pub use state::AppState;
