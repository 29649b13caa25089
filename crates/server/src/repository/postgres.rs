//! PostgreSQL-backed repository.
//!
//! Runtime-checked `sqlx` queries. Aggregate columns are cast to `float8` /
//! `int8` so they decode straight into the `fleet-core` row types.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::debug;

use fleet_core::{
    ActiveRentalRisk, CustomerBehavior, DemandHistoryRow, Equipment, EquipmentFilter,
    EquipmentPerformance, EquipmentUpdate, HealthSnapshot, Rental, RentalFilter, RentalUpdate,
    SeasonalTrend, UtilizationSample,
};

use super::{page_bounds, FleetRepository, RepositoryError};

// ── SQL ──────────────────────────────────────────────────────────────

const DEMAND_HISTORY_SQL: &str = r#"
SELECT e.equipment_type,
       COUNT(r.rental_id)::int8 AS historical_rentals,
       COALESCE(AVG(COALESCE(r.rental_duration_actual, r.rental_duration_planned)), 0)::float8 AS avg_duration,
       s.weather_zone,
       EXTRACT(MONTH FROM r.rental_start_date)::int4 AS month
FROM rentals r
JOIN equipment e ON e.equipment_id = r.equipment_id
LEFT JOIN sites s ON s.site_id = r.site_id
WHERE ($1::text IS NULL OR e.equipment_type = $1)
GROUP BY e.equipment_type, s.weather_zone, EXTRACT(MONTH FROM r.rental_start_date)
ORDER BY e.equipment_type, month
"#;

const MAINTENANCE_CANDIDATES_SQL: &str = r#"
SELECT * FROM (
    SELECT DISTINCT ON (h.equipment_id)
           h.equipment_id,
           e.equipment_type,
           h.overall_health_score::float8 AS overall_health_score,
           h.engine_health::float8 AS engine_health,
           h.hydraulic_health::float8 AS hydraulic_health,
           h.transmission_health::float8 AS transmission_health,
           h.predicted_failure_days::int4 AS predicted_failure_days,
           h.maintenance_priority::int4 AS maintenance_priority,
           h.utilization_rate::float8 AS utilization_rate,
           h.total_runtime_hours::float8 AS total_runtime_hours
    FROM equipment_health h
    JOIN equipment e ON e.equipment_id = h.equipment_id
    ORDER BY h.equipment_id, h.snapshot_date DESC
) latest
WHERE COALESCE(overall_health_score, 0) < 90 OR COALESCE(maintenance_priority, 0) >= 3
ORDER BY maintenance_priority DESC NULLS LAST, overall_health_score ASC NULLS FIRST, equipment_id
"#;

const UTILIZATION_SAMPLES_SQL: &str = r#"
SELECT e.equipment_id,
       e.equipment_type,
       h.utilization_rate::float8 AS utilization_rate,
       COUNT(r.rental_id)::int8 AS rental_frequency
FROM equipment e
LEFT JOIN LATERAL (
    SELECT eh.utilization_rate
    FROM equipment_health eh
    WHERE eh.equipment_id = e.equipment_id
    ORDER BY eh.snapshot_date DESC
    LIMIT 1
) h ON TRUE
LEFT JOIN rentals r
       ON r.equipment_id = e.equipment_id
      AND r.rental_start_date >= CURRENT_DATE - $1::int4
GROUP BY e.equipment_id, e.equipment_type, h.utilization_rate
ORDER BY e.equipment_id
"#;

const ACTIVE_RENTALS_SQL: &str = r#"
SELECT r.rental_id,
       r.equipment_id,
       r.customer_id,
       c.customer_name,
       c.credit_rating::float8 AS credit_rating,
       r.rental_duration_planned::int4 AS rental_duration_planned,
       r.rental_end_date_planned,
       (r.rental_end_date_planned - $1::date)::int4 AS days_until_due
FROM rentals r
LEFT JOIN customers c ON c.customer_id = r.customer_id
WHERE r.status = 'Active'
ORDER BY r.rental_end_date_planned, r.rental_id
"#;

const EQUIPMENT_PERFORMANCE_SQL: &str = r#"
SELECT e.equipment_type,
       COUNT(*)::int8 AS equipment_count,
       COALESCE(AVG(h.utilization_rate), 0)::float8 AS avg_utilization,
       COALESCE(AVG(h.overall_health_score), 0)::float8 AS avg_health_score,
       (COUNT(*) FILTER (WHERE h.maintenance_priority >= 4))::int8 AS high_priority_count
FROM equipment e
LEFT JOIN LATERAL (
    SELECT eh.utilization_rate, eh.overall_health_score, eh.maintenance_priority
    FROM equipment_health eh
    WHERE eh.equipment_id = e.equipment_id
    ORDER BY eh.snapshot_date DESC
    LIMIT 1
) h ON TRUE
GROUP BY e.equipment_type
ORDER BY e.equipment_type
"#;

const CUSTOMER_BEHAVIOR_SQL: &str = r#"
SELECT c.customer_type AS customer_segment,
       COUNT(DISTINCT c.customer_id)::int8 AS customer_count,
       COUNT(r.rental_id)::int8 AS rental_count,
       COALESCE(AVG(COALESCE(r.rental_duration_actual, r.rental_duration_planned)), 0)::float8 AS avg_rental_duration,
       COALESCE(AVG(r.overdue_days), 0)::float8 AS avg_overdue_days,
       COALESCE(SUM(r.rental_rate_per_day * COALESCE(r.rental_duration_actual, r.rental_duration_planned)), 0)::float8 AS total_revenue
FROM customers c
LEFT JOIN rentals r ON r.customer_id = c.customer_id
GROUP BY c.customer_type
ORDER BY c.customer_type
"#;

const SEASONAL_TRENDS_SQL: &str = r#"
SELECT EXTRACT(MONTH FROM r.rental_start_date)::int4 AS month,
       e.equipment_type,
       COUNT(*)::int8 AS rental_count,
       COALESCE(AVG(COALESCE(r.rental_duration_actual, r.rental_duration_planned)), 0)::float8 AS avg_duration
FROM rentals r
JOIN equipment e ON e.equipment_id = r.equipment_id
GROUP BY EXTRACT(MONTH FROM r.rental_start_date), e.equipment_type
ORDER BY month, e.equipment_type
"#;

const EQUIPMENT_COLUMNS: &str =
    "equipment_id, equipment_type, model, year_manufactured::int4 AS year_manufactured, status, site_id";

const RENTAL_COLUMNS: &str = "rental_id, equipment_id, customer_id, site_id, rental_start_date, \
     rental_end_date_planned, rental_end_date_actual, \
     rental_duration_planned::int4 AS rental_duration_planned, \
     rental_duration_actual::int4 AS rental_duration_actual, \
     rental_rate_per_day::float8 AS rental_rate_per_day, \
     overdue_days::int4 AS overdue_days, status";

// ── Repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgFleetRepository {
    pool: PgPool,
}

impl PgFleetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FleetRepository for PgFleetRepository {
    async fn demand_history(
        &self,
        equipment_type: Option<&str>,
    ) -> Result<Vec<DemandHistoryRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, DemandHistoryRow>(DEMAND_HISTORY_SQL)
            .bind(equipment_type)
            .fetch_all(&self.pool)
            .await?;
        debug!(rows = rows.len(), "demand history loaded");
        Ok(rows)
    }

    async fn maintenance_candidates(&self) -> Result<Vec<HealthSnapshot>, RepositoryError> {
        let rows = sqlx::query_as::<_, HealthSnapshot>(MAINTENANCE_CANDIDATES_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn utilization_samples(
        &self,
        window_days: u32,
    ) -> Result<Vec<UtilizationSample>, RepositoryError> {
        let window = i32::try_from(window_days).unwrap_or(i32::MAX);
        let rows = sqlx::query_as::<_, UtilizationSample>(UTILIZATION_SAMPLES_SQL)
            .bind(window)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn active_rentals(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<ActiveRentalRisk>, RepositoryError> {
        let rows = sqlx::query_as::<_, ActiveRentalRisk>(ACTIVE_RENTALS_SQL)
            .bind(today)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn equipment_performance(&self) -> Result<Vec<EquipmentPerformance>, RepositoryError> {
        Ok(sqlx::query_as::<_, EquipmentPerformance>(EQUIPMENT_PERFORMANCE_SQL)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn customer_behavior(&self) -> Result<Vec<CustomerBehavior>, RepositoryError> {
        Ok(sqlx::query_as::<_, CustomerBehavior>(CUSTOMER_BEHAVIOR_SQL)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn seasonal_trends(&self) -> Result<Vec<SeasonalTrend>, RepositoryError> {
        Ok(sqlx::query_as::<_, SeasonalTrend>(SEASONAL_TRENDS_SQL)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_equipment(
        &self,
        filter: &EquipmentFilter,
    ) -> Result<Vec<Equipment>, RepositoryError> {
        let (limit, offset) = page_bounds(filter.limit, filter.offset);
        let sql = format!(
            "SELECT {EQUIPMENT_COLUMNS} FROM equipment \
             WHERE ($1::text IS NULL OR equipment_type = $1) \
               AND ($2::text IS NULL OR status = $2) \
             ORDER BY equipment_id LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, Equipment>(&sql)
            .bind(filter.equipment_type.as_deref())
            .bind(filter.status.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_equipment(&self, id: &str) -> Result<Option<Equipment>, RepositoryError> {
        let sql = format!("SELECT {EQUIPMENT_COLUMNS} FROM equipment WHERE equipment_id = $1");
        let row = sqlx::query_as::<_, Equipment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_equipment(
        &self,
        id: &str,
        update: &EquipmentUpdate,
    ) -> Result<Equipment, RepositoryError> {
        update.validate()?;

        let sql = format!(
            "UPDATE equipment SET \
                 status = COALESCE($2, status), \
                 site_id = COALESCE($3, site_id), \
                 model = COALESCE($4, model) \
             WHERE equipment_id = $1 \
             RETURNING {EQUIPMENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Equipment>(&sql)
            .bind(id)
            .bind(update.status.as_deref())
            .bind(update.site_id.as_deref())
            .bind(update.model.as_deref())
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| RepositoryError::NotFound {
            entity: "equipment",
            id: id.to_string(),
        })
    }

    async fn list_rentals(&self, filter: &RentalFilter) -> Result<Vec<Rental>, RepositoryError> {
        let (limit, offset) = page_bounds(filter.limit, filter.offset);
        let sql = format!(
            "SELECT {RENTAL_COLUMNS} FROM rentals \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY rental_start_date DESC, rental_id LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, Rental>(&sql)
            .bind(filter.status.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_rental(
        &self,
        id: &str,
        update: &RentalUpdate,
    ) -> Result<Rental, RepositoryError> {
        update.validate()?;

        let sql = format!(
            "UPDATE rentals SET \
                 status = COALESCE($2, status), \
                 rental_end_date_planned = COALESCE($3, rental_end_date_planned), \
                 rental_end_date_actual = COALESCE($4, rental_end_date_actual), \
                 overdue_days = COALESCE($5, overdue_days) \
             WHERE rental_id = $1 \
             RETURNING {RENTAL_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Rental>(&sql)
            .bind(id)
            .bind(update.status.as_deref())
            .bind(update.rental_end_date_planned)
            .bind(update.rental_end_date_actual)
            .bind(update.overdue_days)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| RepositoryError::NotFound {
            entity: "rental",
            id: id.to_string(),
        })
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
