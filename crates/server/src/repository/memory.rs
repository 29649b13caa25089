//! In-memory repository over pre-aggregated rows.

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use fleet_core::{
    ActiveRentalRisk, CustomerBehavior, DemandHistoryRow, Equipment, EquipmentFilter,
    EquipmentPerformance, EquipmentUpdate, HealthSnapshot, Rental, RentalFilter, RentalUpdate,
    SeasonalTrend, UtilizationSample,
};

use super::{page_bounds, FleetRepository, RepositoryError};

/// Everything the in-memory store serves. Aggregate rows are stored as the
/// database would return them.
#[derive(Debug, Clone, Default)]
pub struct FleetData {
    pub demand_history: Vec<DemandHistoryRow>,
    pub health: Vec<HealthSnapshot>,
    pub utilization: Vec<UtilizationSample>,
    pub active_rentals: Vec<ActiveRentalRisk>,
    pub equipment_performance: Vec<EquipmentPerformance>,
    pub customer_behavior: Vec<CustomerBehavior>,
    pub seasonal_trends: Vec<SeasonalTrend>,
    pub equipment: Vec<Equipment>,
    pub rentals: Vec<Rental>,
}

#[derive(Default)]
pub struct InMemoryFleetRepository {
    data: RwLock<FleetData>,
    failing: AtomicBool,
}

impl InMemoryFleetRepository {
    pub fn new(data: FleetData) -> Self {
        Self {
            data: RwLock::new(data),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail with [`RepositoryError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    pub async fn snapshot(&self) -> FleetData {
        self.data.read().await.clone()
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(RepositoryError::Unavailable("in-memory store set to fail".into()));
        }
        Ok(())
    }
}

fn urgency(a: &HealthSnapshot, b: &HealthSnapshot) -> CmpOrdering {
    // Priority descending with missing last, then health ascending with missing first.
    let by_priority = match (a.maintenance_priority, b.maintenance_priority) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        (None, None) => CmpOrdering::Equal,
    };
    by_priority
        .then_with(|| match (a.overall_health_score, b.overall_health_score) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(CmpOrdering::Equal),
            (None, Some(_)) => CmpOrdering::Less,
            (Some(_), None) => CmpOrdering::Greater,
            (None, None) => CmpOrdering::Equal,
        })
        .then_with(|| a.equipment_id.cmp(&b.equipment_id))
}

fn page<T>(items: impl Iterator<Item = T>, limit: i64, offset: i64) -> Vec<T> {
    let (limit, offset) = page_bounds(limit, offset);
    items.skip(offset as usize).take(limit as usize).collect()
}

#[async_trait]
impl FleetRepository for InMemoryFleetRepository {
    async fn demand_history(
        &self,
        equipment_type: Option<&str>,
    ) -> Result<Vec<DemandHistoryRow>, RepositoryError> {
        self.check()?;
        let data = self.data.read().await;
        Ok(data
            .demand_history
            .iter()
            .filter(|r| equipment_type.is_none_or(|t| r.equipment_type == t))
            .cloned()
            .collect())
    }

    async fn maintenance_candidates(&self) -> Result<Vec<HealthSnapshot>, RepositoryError> {
        self.check()?;
        let data = self.data.read().await;
        let mut rows: Vec<HealthSnapshot> =
            data.health.iter().filter(|s| s.needs_attention()).cloned().collect();
        rows.sort_by(urgency);
        Ok(rows)
    }

    async fn utilization_samples(
        &self,
        _window_days: u32,
    ) -> Result<Vec<UtilizationSample>, RepositoryError> {
        self.check()?;
        Ok(self.data.read().await.utilization.clone())
    }

    async fn active_rentals(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<ActiveRentalRisk>, RepositoryError> {
        self.check()?;
        let data = self.data.read().await;
        let mut rows: Vec<ActiveRentalRisk> = data
            .active_rentals
            .iter()
            .cloned()
            .map(|mut r| {
                r.days_until_due = (r.rental_end_date_planned - today).num_days() as i32;
                r
            })
            .collect();
        rows.sort_by(|a, b| {
            a.rental_end_date_planned
                .cmp(&b.rental_end_date_planned)
                .then_with(|| a.rental_id.cmp(&b.rental_id))
        });
        Ok(rows)
    }

    async fn equipment_performance(&self) -> Result<Vec<EquipmentPerformance>, RepositoryError> {
        self.check()?;
        Ok(self.data.read().await.equipment_performance.clone())
    }

    async fn customer_behavior(&self) -> Result<Vec<CustomerBehavior>, RepositoryError> {
        self.check()?;
        Ok(self.data.read().await.customer_behavior.clone())
    }

    async fn seasonal_trends(&self) -> Result<Vec<SeasonalTrend>, RepositoryError> {
        self.check()?;
        Ok(self.data.read().await.seasonal_trends.clone())
    }

    async fn list_equipment(
        &self,
        filter: &EquipmentFilter,
    ) -> Result<Vec<Equipment>, RepositoryError> {
        self.check()?;
        let data = self.data.read().await;
        let matching = data
            .equipment
            .iter()
            .filter(|e| filter.equipment_type.as_deref().is_none_or(|t| e.equipment_type == t))
            .filter(|e| filter.status.as_deref().is_none_or(|s| e.status == s))
            .cloned();
        Ok(page(matching, filter.limit, filter.offset))
    }

    async fn get_equipment(&self, id: &str) -> Result<Option<Equipment>, RepositoryError> {
        self.check()?;
        let data = self.data.read().await;
        Ok(data.equipment.iter().find(|e| e.equipment_id == id).cloned())
    }

    async fn update_equipment(
        &self,
        id: &str,
        update: &EquipmentUpdate,
    ) -> Result<Equipment, RepositoryError> {
        self.check()?;
        update.validate()?;
        let mut data = self.data.write().await;
        let equipment = data
            .equipment
            .iter_mut()
            .find(|e| e.equipment_id == id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "equipment",
                id: id.to_string(),
            })?;
        update.apply(equipment);
        Ok(equipment.clone())
    }

    async fn list_rentals(&self, filter: &RentalFilter) -> Result<Vec<Rental>, RepositoryError> {
        self.check()?;
        let data = self.data.read().await;
        let mut matching: Vec<Rental> = data
            .rentals
            .iter()
            .filter(|r| filter.status.as_deref().is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.rental_start_date
                .cmp(&a.rental_start_date)
                .then_with(|| a.rental_id.cmp(&b.rental_id))
        });
        Ok(page(matching.into_iter(), filter.limit, filter.offset))
    }

    async fn update_rental(
        &self,
        id: &str,
        update: &RentalUpdate,
    ) -> Result<Rental, RepositoryError> {
        self.check()?;
        update.validate()?;
        let mut data = self.data.write().await;
        let rental = data
            .rentals
            .iter_mut()
            .find(|r| r.rental_id == id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "rental",
                id: id.to_string(),
            })?;
        update.apply(rental);
        Ok(rental.clone())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check()
    }
}
