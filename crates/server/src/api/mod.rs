//! HTTP handlers, one module per resource.

pub mod doc;
mod equipment;
mod error;
mod health;
mod predictions;
mod rentals;

pub use equipment::equipment_router;
pub use error::{ApiError, ErrorBody};
pub(crate) use health::health;
pub use health::HealthResponse;
pub use predictions::{predictions_router, DemandQuery, InsightsResponse};
pub use rentals::rentals_router;
