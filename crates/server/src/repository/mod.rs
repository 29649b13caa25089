//! Storage seam for the HTTP layer.
//!
//! Handlers only see [`FleetRepository`]. [`PgFleetRepository`] runs the
//! aggregation queries against PostgreSQL; [`InMemoryFleetRepository`] holds
//! plain vectors for tests and local runs without a database.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use fleet_core::{
    ActiveRentalRisk, CustomerBehavior, DemandHistoryRow, Equipment, EquipmentFilter,
    EquipmentPerformance, EquipmentUpdate, FleetError, HealthSnapshot, Rental, RentalFilter,
    RentalUpdate, SeasonalTrend, UtilizationSample,
};

pub use memory::{FleetData, InMemoryFleetRepository};
pub use postgres::PgFleetRepository;

/// Largest page a list query returns.
pub const MAX_PAGE_SIZE: i64 = 500;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Invalid(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<FleetError> for RepositoryError {
    fn from(e: FleetError) -> Self {
        Self::Invalid(e.to_string())
    }
}

/// Clamp caller-supplied paging into a range the store accepts.
pub fn page_bounds(limit: i64, offset: i64) -> (i64, i64) {
    (limit.clamp(1, MAX_PAGE_SIZE), offset.max(0))
}

#[async_trait]
pub trait FleetRepository: Send + Sync {
    /// Rental counts grouped by equipment type, weather zone and start month.
    async fn demand_history(
        &self,
        equipment_type: Option<&str>,
    ) -> Result<Vec<DemandHistoryRow>, RepositoryError>;

    /// Latest health snapshot per equipment, restricted to equipment that
    /// needs attention, most urgent first.
    async fn maintenance_candidates(&self) -> Result<Vec<HealthSnapshot>, RepositoryError>;

    async fn utilization_samples(
        &self,
        window_days: u32,
    ) -> Result<Vec<UtilizationSample>, RepositoryError>;

    /// Open rentals with the customer's credit rating, soonest due first.
    async fn active_rentals(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<ActiveRentalRisk>, RepositoryError>;

    async fn equipment_performance(&self) -> Result<Vec<EquipmentPerformance>, RepositoryError>;

    async fn customer_behavior(&self) -> Result<Vec<CustomerBehavior>, RepositoryError>;

    async fn seasonal_trends(&self) -> Result<Vec<SeasonalTrend>, RepositoryError>;

    async fn list_equipment(
        &self,
        filter: &EquipmentFilter,
    ) -> Result<Vec<Equipment>, RepositoryError>;

    async fn get_equipment(&self, id: &str) -> Result<Option<Equipment>, RepositoryError>;

    async fn update_equipment(
        &self,
        id: &str,
        update: &EquipmentUpdate,
    ) -> Result<Equipment, RepositoryError>;

    async fn list_rentals(&self, filter: &RentalFilter) -> Result<Vec<Rental>, RepositoryError>;

    async fn update_rental(
        &self,
        id: &str,
        update: &RentalUpdate,
    ) -> Result<Rental, RepositoryError>;

    /// Liveness check used by `/health`.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
