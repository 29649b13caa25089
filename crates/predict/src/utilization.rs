//! Utilization forecasts and idle-capacity revenue estimates.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use fleet_core::UtilizationSample;

use crate::noise::NoiseSource;
use crate::tables::PredictionTables;
use crate::Trend;

/// Rentals in the window above which utilization is expected to rise.
const BUSY_RENTAL_FREQUENCY: i64 = 2;
const UNDERUSED_BELOW: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UtilizationPrediction {
    pub equipment_id: String,
    pub equipment_type: String,
    pub current_utilization: f64,
    /// 0..=100, includes random noise.
    pub predicted_utilization: f64,
    pub trend: Trend,
    pub rental_frequency: i64,
    pub optimization_potential: f64,
    pub revenue_potential: f64,
    pub warnings: Vec<String>,
}

pub fn utilization_warnings(current: f64) -> Vec<String> {
    let mut warnings = Vec::new();
    if current < UNDERUSED_BELOW {
        warnings.push("Very low utilization rate - equipment underused".to_string());
    }
    warnings
}

pub fn predict_sample(
    sample: &UtilizationSample,
    tables: &PredictionTables,
    noise: &mut dyn NoiseSource,
) -> UtilizationPrediction {
    let current = crate::or_zero(sample.utilization_rate);
    let trend = if sample.rental_frequency > BUSY_RENTAL_FREQUENCY {
        Trend::Increasing
    } else {
        Trend::Stable
    };
    let drift = match trend {
        Trend::Increasing => 10.0,
        _ => -5.0,
    };
    let predicted = (current + drift + noise.sample(-5.0, 5.0)).clamp(0.0, 100.0);

    let optimization_potential = (tables.utilization_target - current).max(0.0);
    let revenue_potential =
        (optimization_potential / 100.0 * tables.utilization_daily_rate * 30.0).round();

    UtilizationPrediction {
        equipment_id: sample.equipment_id.clone(),
        equipment_type: sample.equipment_type.clone(),
        current_utilization: current,
        predicted_utilization: crate::round1(predicted),
        trend,
        rental_frequency: sample.rental_frequency,
        optimization_potential: crate::round1(optimization_potential),
        revenue_potential,
        warnings: utilization_warnings(current),
    }
}

pub fn predict_utilization(
    samples: &[UtilizationSample],
    tables: &PredictionTables,
    noise: &mut dyn NoiseSource,
) -> Vec<UtilizationPrediction> {
    samples
        .iter()
        .map(|s| predict_sample(s, tables, noise))
        .collect()
}
