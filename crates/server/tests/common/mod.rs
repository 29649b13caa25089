//! Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Days, NaiveDate, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use fleet_core::config::PredictionConfig;
use fleet_core::{
    ActiveRentalRisk, CustomerBehavior, DemandHistoryRow, Equipment, EquipmentPerformance,
    HealthSnapshot, Rental, SeasonalTrend, UtilizationSample,
};
use fleet_predict::PredictionTables;
use fleet_server::{build_router, AppState, FleetData, InMemoryFleetRepository};

pub fn app(repo: Arc<InMemoryFleetRepository>, noise_seed: Option<u64>) -> Router {
    let prediction = PredictionConfig {
        noise_seed,
        ..Default::default()
    };
    let state = Arc::new(AppState::new(repo, PredictionTables::default(), &prediction));
    build_router(state, "*")
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn patch(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::patch(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub fn today_plus(days: u64) -> NaiveDate {
    Utc::now().date_naive().checked_add_days(Days::new(days)).unwrap()
}

fn demand_row(equipment_type: &str, rentals: i64, month: i32) -> DemandHistoryRow {
    DemandHistoryRow {
        equipment_type: equipment_type.into(),
        historical_rentals: rentals,
        avg_duration: 9.5,
        weather_zone: Some("coastal".into()),
        month,
    }
}

pub fn fleet() -> FleetData {
    FleetData {
        demand_history: vec![
            demand_row("Scissor Lift", 10, 3),
            demand_row("Scissor Lift", 14, 4),
            demand_row("Excavator", 20, 5),
        ],
        health: vec![
            HealthSnapshot {
                equipment_id: "EQ-1".into(),
                equipment_type: "Excavator".into(),
                overall_health_score: Some(100.0),
                maintenance_priority: Some(1),
                utilization_rate: Some(0.0),
                total_runtime_hours: Some(0.0),
                ..Default::default()
            },
            HealthSnapshot {
                equipment_id: "EQ-2".into(),
                equipment_type: "Excavator".into(),
                overall_health_score: Some(0.0),
                engine_health: Some(40.0),
                hydraulic_health: Some(50.0),
                transmission_health: Some(60.0),
                predicted_failure_days: Some(3),
                maintenance_priority: Some(5),
                utilization_rate: Some(100.0),
                total_runtime_hours: Some(10_000.0),
            },
            HealthSnapshot {
                equipment_id: "EQ-3".into(),
                equipment_type: "Crane".into(),
                overall_health_score: Some(85.0),
                engine_health: Some(70.0),
                maintenance_priority: Some(2),
                utilization_rate: Some(40.0),
                total_runtime_hours: Some(1500.0),
                ..Default::default()
            },
        ],
        utilization: vec![
            UtilizationSample {
                equipment_id: "EQ-1".into(),
                equipment_type: "Excavator".into(),
                utilization_rate: Some(60.0),
                rental_frequency: 4,
            },
            UtilizationSample {
                equipment_id: "EQ-4".into(),
                equipment_type: "Generator".into(),
                utilization_rate: Some(10.0),
                rental_frequency: 0,
            },
        ],
        active_rentals: vec![
            ActiveRentalRisk {
                rental_id: "R-2".into(),
                equipment_id: "EQ-2".into(),
                customer_id: "C-2".into(),
                customer_name: None,
                credit_rating: None,
                rental_duration_planned: Some(60),
                rental_end_date_planned: today_plus(12),
                days_until_due: 0,
            },
            ActiveRentalRisk {
                rental_id: "R-1".into(),
                equipment_id: "EQ-1".into(),
                customer_id: "C-1".into(),
                customer_name: Some("Harbor Works".into()),
                credit_rating: Some(9.0),
                rental_duration_planned: Some(10),
                rental_end_date_planned: today_plus(5),
                days_until_due: 0,
            },
        ],
        equipment_performance: vec![
            EquipmentPerformance {
                equipment_type: "Bulldozer".into(),
                equipment_count: 3,
                avg_utilization: 82.0,
                avg_health_score: 71.0,
                high_priority_count: 1,
            },
            EquipmentPerformance {
                equipment_type: "Excavator".into(),
                equipment_count: 5,
                avg_utilization: 64.5,
                avg_health_score: 88.0,
                high_priority_count: 0,
            },
        ],
        customer_behavior: vec![CustomerBehavior {
            customer_segment: "Corporate".into(),
            customer_count: 12,
            rental_count: 48,
            avg_rental_duration: 14.0,
            avg_overdue_days: 3.5,
            total_revenue: 310_000.0,
        }],
        seasonal_trends: vec![SeasonalTrend {
            month: 6,
            equipment_type: "Excavator".into(),
            rental_count: 9,
            avg_duration: 11.0,
        }],
        equipment: vec![
            Equipment {
                equipment_id: "EQ-1".into(),
                equipment_type: "Excavator".into(),
                model: Some("320 GC".into()),
                year_manufactured: Some(2020),
                status: "Rented".into(),
                site_id: Some("S-1".into()),
            },
            Equipment {
                equipment_id: "EQ-2".into(),
                equipment_type: "Excavator".into(),
                model: None,
                year_manufactured: Some(2016),
                status: "Maintenance".into(),
                site_id: Some("S-2".into()),
            },
        ],
        rentals: vec![
            Rental {
                rental_id: "R-1".into(),
                equipment_id: "EQ-1".into(),
                customer_id: "C-1".into(),
                site_id: Some("S-1".into()),
                rental_start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                rental_end_date_planned: NaiveDate::from_ymd_opt(2024, 6, 11).unwrap(),
                rental_end_date_actual: None,
                rental_duration_planned: Some(10),
                rental_duration_actual: None,
                rental_rate_per_day: Some(450.0),
                overdue_days: None,
                status: "Active".into(),
            },
            Rental {
                rental_id: "R-0".into(),
                equipment_id: "EQ-2".into(),
                customer_id: "C-2".into(),
                site_id: None,
                rental_start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                rental_end_date_planned: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
                rental_end_date_actual: NaiveDate::from_ymd_opt(2024, 3, 22),
                rental_duration_planned: Some(19),
                rental_duration_actual: Some(21),
                rental_rate_per_day: Some(600.0),
                overdue_days: Some(2),
                status: "Completed".into(),
            },
        ],
    }
}

pub fn repo() -> Arc<InMemoryFleetRepository> {
    Arc::new(InMemoryFleetRepository::new(fleet()))
}
