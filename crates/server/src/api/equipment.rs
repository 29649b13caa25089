//! Equipment listing and the explicit equipment update.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{info, warn};

use fleet_core::{Equipment, EquipmentFilter, EquipmentUpdate};

use crate::state::AppState;

use super::error::{ApiError, ErrorBody};

pub fn equipment_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/equipment", get(list_equipment))
        .route("/equipment/{id}", get(get_equipment).patch(update_equipment))
}

/// List equipment, optionally filtered by type and status.
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "Equipment",
    params(EquipmentFilter),
    responses(
        (status = 200, description = "Equipment page", body = Vec<Equipment>),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub(crate) async fn list_equipment(
    State(state): State<Arc<AppState>>,
    query: Result<Query<EquipmentFilter>, QueryRejection>,
) -> Result<Json<Vec<Equipment>>, ApiError> {
    let filter = match query {
        Ok(Query(filter)) => filter,
        Err(rejection) => {
            warn!("ignoring malformed equipment filter: {}", rejection.body_text());
            EquipmentFilter::default()
        }
    };
    Ok(Json(state.repo.list_equipment(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "Equipment",
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment record", body = Equipment),
        (status = 404, description = "Unknown equipment", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub(crate) async fn get_equipment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Equipment>, ApiError> {
    state
        .repo
        .get_equipment(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("equipment not found: {}", id)))
}

/// Change status, site or model. Unknown fields are rejected.
#[utoipa::path(
    patch,
    path = "/equipment/{id}",
    tag = "Equipment",
    params(("id" = String, Path, description = "Equipment ID")),
    request_body = EquipmentUpdate,
    responses(
        (status = 200, description = "Updated record", body = Equipment),
        (status = 400, description = "Malformed or empty update", body = ErrorBody),
        (status = 404, description = "Unknown equipment", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub(crate) async fn update_equipment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<EquipmentUpdate>, JsonRejection>,
) -> Result<Json<Equipment>, ApiError> {
    let Json(update) = body?;
    let equipment = state.repo.update_equipment(&id, &update).await?;
    info!(equipment_id = %id, status = %equipment.status, "equipment updated");
    Ok(Json(equipment))
}
