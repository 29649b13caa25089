//! Aggregation rows produced by the store and consumed by the prediction layer.
//!
//! Metric columns are `Option` because the underlying tables allow NULLs;
//! consumers treat a missing value as zero or absent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Historical rentals grouped by equipment type, weather zone and calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct DemandHistoryRow {
    pub equipment_type: String,
    pub historical_rentals: i64,
    pub avg_duration: f64,
    pub weather_zone: Option<String>,
    /// Calendar month, 1..=12.
    pub month: i32,
}

/// Latest health snapshot for one piece of equipment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct HealthSnapshot {
    pub equipment_id: String,
    pub equipment_type: String,
    pub overall_health_score: Option<f64>,
    pub engine_health: Option<f64>,
    pub hydraulic_health: Option<f64>,
    pub transmission_health: Option<f64>,
    pub predicted_failure_days: Option<i32>,
    /// Ordinal urgency, 1 (low) to 5 (critical).
    pub maintenance_priority: Option<i32>,
    /// Percentage, 0..=100.
    pub utilization_rate: Option<f64>,
    pub total_runtime_hours: Option<f64>,
}

impl HealthSnapshot {
    /// Whether this snapshot qualifies for the maintenance risk listing.
    pub fn needs_attention(&self) -> bool {
        self.overall_health_score.unwrap_or(0.0) < 90.0
            || self.maintenance_priority.unwrap_or(0) >= 3
    }
}

/// Current utilization and recent rental frequency for one piece of equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct UtilizationSample {
    pub equipment_id: String,
    pub equipment_type: String,
    pub utilization_rate: Option<f64>,
    /// Rentals started inside the trailing window.
    pub rental_frequency: i64,
}

/// An open rental joined with the renting customer's credit profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ActiveRentalRisk {
    pub rental_id: String,
    pub equipment_id: String,
    pub customer_id: String,
    pub customer_name: Option<String>,
    /// Credit rating on a 1..=10 scale.
    pub credit_rating: Option<f64>,
    pub rental_duration_planned: Option<i32>,
    pub rental_end_date_planned: NaiveDate,
    pub days_until_due: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct EquipmentPerformance {
    pub equipment_type: String,
    pub equipment_count: i64,
    pub avg_utilization: f64,
    pub avg_health_score: f64,
    /// Equipment of this type whose latest maintenance priority is 4 or higher.
    pub high_priority_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CustomerBehavior {
    pub customer_segment: String,
    pub customer_count: i64,
    pub rental_count: i64,
    pub avg_rental_duration: f64,
    pub avg_overdue_days: f64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SeasonalTrend {
    pub month: i32,
    pub equipment_type: String,
    pub rental_count: i64,
    pub avg_duration: f64,
}
