//! Demand estimation from grouped rental history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use fleet_core::DemandHistoryRow;

use crate::tables::PredictionTables;
use crate::Trend;

pub const DEFAULT_PERIOD_DAYS: u32 = 30;

const MIN_CONFIDENCE: u32 = 60;
const MAX_CONFIDENCE: u32 = 95;

#[derive(Debug, Clone)]
pub struct DemandRequest<'a> {
    /// Restrict the forecast to one equipment type.
    pub equipment_type: Option<&'a str>,
    pub period_days: u32,
    /// Current calendar month, 1..=12.
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DemandForecast {
    pub equipment_type: String,
    pub predicted_demand: i64,
    /// Always within 60..=95.
    pub confidence_score: u32,
    pub trend: Trend,
    pub factors: Vec<String>,
    pub historical_average: f64,
    pub seasonal_multiplier: f64,
    pub period_days: u32,
}

/// Parse the `period` query value. Anything that is not a positive integer
/// becomes [`DEFAULT_PERIOD_DAYS`].
pub fn parse_period(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|days| *days > 0)
        .unwrap_or(DEFAULT_PERIOD_DAYS)
}

fn confidence(row_count: usize) -> u32 {
    if row_count == 0 {
        return MIN_CONFIDENCE;
    }
    let raw = 80u32.saturating_add(2u32.saturating_mul(row_count as u32));
    raw.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// One forecast per equipment type present in `rows`, ordered by type name.
///
/// With a type filter, exactly one forecast is returned for that type, a
/// zero forecast when no history exists.
pub fn forecast_demand(
    rows: &[DemandHistoryRow],
    request: &DemandRequest<'_>,
    tables: &PredictionTables,
) -> Vec<DemandForecast> {
    let mut groups: BTreeMap<&str, Vec<&DemandHistoryRow>> = BTreeMap::new();
    for row in rows {
        if let Some(wanted) = request.equipment_type {
            if row.equipment_type != wanted {
                continue;
            }
        }
        groups.entry(row.equipment_type.as_str()).or_default().push(row);
    }

    if let Some(wanted) = request.equipment_type {
        groups.entry(wanted).or_default();
    }

    groups
        .into_iter()
        .map(|(equipment_type, group)| forecast_type(equipment_type, &group, request, tables))
        .collect()
}

fn forecast_type(
    equipment_type: &str,
    group: &[&DemandHistoryRow],
    request: &DemandRequest<'_>,
    tables: &PredictionTables,
) -> DemandForecast {
    let historical_average = if group.is_empty() {
        0.0
    } else {
        group.iter().map(|r| r.historical_rentals as f64).sum::<f64>() / group.len() as f64
    };

    let multiplier = tables.seasonal_multiplier(equipment_type, request.month);
    let scale = request.period_days as f64 / DEFAULT_PERIOD_DAYS as f64;
    let predicted = (historical_average * multiplier * scale).round();

    let trend = if predicted > historical_average {
        Trend::Increasing
    } else {
        Trend::Decreasing
    };

    DemandForecast {
        equipment_type: equipment_type.to_string(),
        predicted_demand: predicted as i64,
        confidence_score: confidence(group.len()),
        trend,
        factors: tables.demand_factors.clone(),
        historical_average: crate::round1(historical_average),
        seasonal_multiplier: multiplier,
        period_days: request.period_days,
    }
}
