//! OpenAPI documentation aggregator.
//!
//! Collects the `#[utoipa::path]` handlers and `ToSchema` types into one
//! OpenAPI 3.1 document, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "fleet-server API",
        version = "0.1.0",
        description = "Heuristic demand, maintenance, utilization and return-date predictions for a rental fleet.",
    ),
    tags(
        (name = "Health", description = "Server liveness and store reachability"),
        (name = "Predictions", description = "Derived metrics recomputed on every request"),
        (name = "Equipment", description = "Equipment listing and explicit updates"),
        (name = "Rentals", description = "Rental listing and explicit updates"),
    ),
    paths(
        // Health
        crate::api::health::health,
        // Predictions
        crate::api::predictions::demand,
        crate::api::predictions::maintenance,
        crate::api::predictions::utilization,
        crate::api::predictions::return_dates,
        crate::api::predictions::insights,
        // Equipment
        crate::api::equipment::list_equipment,
        crate::api::equipment::get_equipment,
        crate::api::equipment::update_equipment,
        // Rentals
        crate::api::rentals::list_rentals,
        crate::api::rentals::update_rental,
    ),
    components(schemas(
        crate::api::error::ErrorBody,
        crate::api::health::HealthResponse,
        crate::api::predictions::InsightsResponse,
        fleet_predict::DemandForecast,
        fleet_predict::MaintenancePrediction,
        fleet_predict::UtilizationPrediction,
        fleet_predict::ReturnDatePrediction,
        fleet_predict::Recommendation,
        fleet_predict::RecommendationKind,
        fleet_predict::Priority,
        fleet_predict::RiskLevel,
        fleet_predict::Trend,
        fleet_core::EquipmentPerformance,
        fleet_core::CustomerBehavior,
        fleet_core::SeasonalTrend,
        fleet_core::Equipment,
        fleet_core::EquipmentUpdate,
        fleet_core::Rental,
        fleet_core::RentalUpdate,
    ))
)]
pub struct ApiDoc;
