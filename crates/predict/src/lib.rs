//! Heuristic fleet predictions.
//!
//! Each module turns one aggregate shape from `fleet-core` into a prediction
//! payload. Scorers that add noise take a [`NoiseSource`] so callers decide
//! between entropy and a seeded generator.

pub mod demand;
pub mod maintenance;
pub mod noise;
pub mod recommend;
pub mod return_risk;
pub mod tables;
pub mod utilization;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use demand::{forecast_demand, parse_period, DemandForecast, DemandRequest};
pub use maintenance::{score_maintenance, MaintenancePrediction};
pub use noise::{FixedNoise, NoiseSource, RandomNoise};
pub use recommend::{generate_recommendations, InsightSets, Priority, Recommendation, RecommendationKind};
pub use return_risk::{predict_return_dates, ReturnDatePrediction, RiskLevel};
pub use tables::PredictionTables;
pub use utilization::{predict_utilization, UtilizationPrediction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

/// Missing and non-finite measurements both count as zero.
pub(crate) fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round1_keeps_one_decimal() {
        assert_eq!(round1(47.549), 47.5);
        assert_eq!(round1(12.25), 12.3);
        assert_eq!(round1(-0.04), -0.0);
    }

    #[test]
    fn non_finite_measurements_count_as_zero() {
        assert_eq!(or_zero(Some(42.5)), 42.5);
        assert_eq!(or_zero(None), 0.0);
        assert_eq!(or_zero(Some(f64::NAN)), 0.0);
        assert_eq!(or_zero(Some(f64::INFINITY)), 0.0);
    }

    #[test]
    fn trend_is_lowercase_on_the_wire() {
        assert_eq!(serde_json::to_string(&Trend::Increasing).unwrap(), "\"increasing\"");
    }
}
