//! Maintenance risk scoring over the latest health snapshots.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use fleet_core::HealthSnapshot;

use crate::noise::NoiseSource;
use crate::tables::PredictionTables;

const ENGINE_THRESHOLD: f64 = 80.0;
const HYDRAULIC_THRESHOLD: f64 = 75.0;
const TRANSMISSION_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MaintenancePrediction {
    pub equipment_id: String,
    pub equipment_type: String,
    /// 0..=100.
    pub risk_score: u32,
    /// 5..=95, includes random noise.
    pub failure_probability: u32,
    pub predicted_issues: Vec<String>,
    pub maintenance_window: String,
    pub cost_estimate: f64,
    pub overall_health_score: Option<f64>,
    pub maintenance_priority: Option<i32>,
    pub predicted_failure_days: Option<i32>,
}

/// Deterministic part of the score. Missing inputs count as zero.
pub fn risk_score(snapshot: &HealthSnapshot) -> u32 {
    let health = crate::or_zero(snapshot.overall_health_score);
    let utilization = crate::or_zero(snapshot.utilization_rate);
    let runtime = crate::or_zero(snapshot.total_runtime_hours);

    let raw = ((100.0 - health) / 100.0 + utilization / 100.0 + runtime / 10_000.0) * 33.33;
    let score = raw.round();
    if score.is_nan() {
        return 0;
    }
    score.clamp(0.0, 100.0) as u32
}

pub fn predicted_issues(snapshot: &HealthSnapshot) -> Vec<String> {
    let mut issues = Vec::new();
    if snapshot.engine_health.is_some_and(|h| h < ENGINE_THRESHOLD) {
        issues.push("Engine performance degradation".to_string());
    }
    if snapshot.hydraulic_health.is_some_and(|h| h < HYDRAULIC_THRESHOLD) {
        issues.push("Hydraulic system wear".to_string());
    }
    if snapshot.transmission_health.is_some_and(|h| h < TRANSMISSION_THRESHOLD) {
        issues.push("Transmission wear detected".to_string());
    }
    issues
}

pub fn cost_estimate(snapshot: &HealthSnapshot, tables: &PredictionTables) -> f64 {
    let priority = snapshot.maintenance_priority.unwrap_or(0).max(0) as f64;
    (tables.base_cost(&snapshot.equipment_type) * (1.0 + priority * 0.3)).round()
}

pub fn score_snapshot(
    snapshot: &HealthSnapshot,
    tables: &PredictionTables,
    noise: &mut dyn NoiseSource,
) -> MaintenancePrediction {
    let risk = risk_score(snapshot);
    let failure = (risk as f64 + noise.sample(-10.0, 10.0)).clamp(5.0, 95.0).round() as u32;

    MaintenancePrediction {
        equipment_id: snapshot.equipment_id.clone(),
        equipment_type: snapshot.equipment_type.clone(),
        risk_score: risk,
        failure_probability: failure,
        predicted_issues: predicted_issues(snapshot),
        maintenance_window: tables.maintenance_window(snapshot.maintenance_priority).to_string(),
        cost_estimate: cost_estimate(snapshot, tables),
        overall_health_score: snapshot.overall_health_score,
        maintenance_priority: snapshot.maintenance_priority,
        predicted_failure_days: snapshot.predicted_failure_days,
    }
}

/// Score every snapshot, preserving the store's ordering.
pub fn score_maintenance(
    snapshots: &[HealthSnapshot],
    tables: &PredictionTables,
    noise: &mut dyn NoiseSource,
) -> Vec<MaintenancePrediction> {
    snapshots
        .iter()
        .map(|s| score_snapshot(s, tables, noise))
        .collect()
}
