//! Prediction endpoints: query the repository, then score synchronously.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use fleet_core::{CustomerBehavior, EquipmentPerformance, SeasonalTrend};
use fleet_predict::{
    forecast_demand, generate_recommendations, parse_period, predict_return_dates,
    predict_utilization, score_maintenance, DemandForecast, DemandRequest, InsightSets,
    MaintenancePrediction, Recommendation, ReturnDatePrediction, UtilizationPrediction,
};

use crate::state::AppState;

use super::error::{ApiError, ErrorBody};

pub fn predictions_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/predictions/demand", get(demand))
        .route("/predictions/maintenance", get(maintenance))
        .route("/predictions/utilization", get(utilization))
        .route("/predictions/return-dates", get(return_dates))
        .route("/predictions/insights", get(insights))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DemandQuery {
    /// Restrict the forecast to one equipment type.
    pub equipment_type: Option<String>,
    /// Forecast window in days (default 30). Unparsable values use the default.
    pub period: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub equipment_performance: Vec<EquipmentPerformance>,
    pub customer_behavior: Vec<CustomerBehavior>,
    pub seasonal_trends: Vec<SeasonalTrend>,
    pub recommendations: Vec<Recommendation>,
}

/// Demand forecast per equipment type for the requested window.
#[utoipa::path(
    get,
    path = "/predictions/demand",
    tag = "Predictions",
    params(DemandQuery),
    responses(
        (status = 200, description = "Forecast per equipment type", body = Vec<DemandForecast>),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub(crate) async fn demand(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DemandQuery>,
) -> Result<Json<Vec<DemandForecast>>, ApiError> {
    let equipment_type = query
        .equipment_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let period_days = parse_period(query.period.as_deref());

    let rows = state.repo.demand_history(equipment_type).await?;
    debug!(rows = rows.len(), period_days, "forecasting demand");

    let request = DemandRequest {
        equipment_type,
        period_days,
        month: Utc::now().month(),
    };
    Ok(Json(forecast_demand(&rows, &request, &state.tables)))
}

/// Maintenance risk for equipment that needs attention.
#[utoipa::path(
    get,
    path = "/predictions/maintenance",
    tag = "Predictions",
    responses(
        (status = 200, description = "Scored equipment, most urgent first", body = Vec<MaintenancePrediction>),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub(crate) async fn maintenance(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MaintenancePrediction>>, ApiError> {
    let snapshots = state.repo.maintenance_candidates().await?;
    let mut noise = state.noise();
    Ok(Json(score_maintenance(&snapshots, &state.tables, &mut noise)))
}

/// Utilization forecast and idle-capacity revenue per equipment.
#[utoipa::path(
    get,
    path = "/predictions/utilization",
    tag = "Predictions",
    responses(
        (status = 200, description = "Utilization forecast per equipment", body = Vec<UtilizationPrediction>),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub(crate) async fn utilization(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UtilizationPrediction>>, ApiError> {
    let samples = state
        .repo
        .utilization_samples(state.utilization_window_days)
        .await?;
    let mut noise = state.noise();
    Ok(Json(predict_utilization(&samples, &state.tables, &mut noise)))
}

/// Late-return risk for every active rental.
#[utoipa::path(
    get,
    path = "/predictions/return-dates",
    tag = "Predictions",
    responses(
        (status = 200, description = "Risk per active rental, soonest due first", body = Vec<ReturnDatePrediction>),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub(crate) async fn return_dates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReturnDatePrediction>>, ApiError> {
    let today = Utc::now().date_naive();
    let rentals = state.repo.active_rentals(today).await?;
    let mut noise = state.noise();
    Ok(Json(predict_return_dates(&rentals, &mut noise)))
}

/// Fleet aggregates plus rule-based recommendations.
#[utoipa::path(
    get,
    path = "/predictions/insights",
    tag = "Predictions",
    responses(
        (status = 200, description = "Aggregates and recommendations", body = InsightsResponse),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub(crate) async fn insights(
    State(state): State<Arc<AppState>>,
) -> Result<Json<InsightsResponse>, ApiError> {
    let (equipment_performance, customer_behavior, seasonal_trends) = tokio::try_join!(
        state.repo.equipment_performance(),
        state.repo.customer_behavior(),
        state.repo.seasonal_trends(),
    )?;

    let sets = InsightSets {
        equipment_performance,
        customer_behavior,
        seasonal_trends,
    };
    let recommendations = generate_recommendations(&sets);

    Ok(Json(InsightsResponse {
        equipment_performance: sets.equipment_performance,
        customer_behavior: sets.customer_behavior,
        seasonal_trends: sets.seasonal_trends,
        recommendations,
    }))
}
