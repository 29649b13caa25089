use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use tracing::{info, warn};

use fleet_core::{Rental, RentalFilter, RentalUpdate};

use crate::state::AppState;

use super::error::{ApiError, ErrorBody};

pub fn rentals_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rentals", get(list_rentals))
        .route("/rentals/{id}", patch(update_rental))
}

/// List rentals, newest first.
#[utoipa::path(
    get,
    path = "/rentals",
    tag = "Rentals",
    params(RentalFilter),
    responses(
        (status = 200, description = "Rental page", body = Vec<Rental>),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub(crate) async fn list_rentals(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RentalFilter>, QueryRejection>,
) -> Result<Json<Vec<Rental>>, ApiError> {
    let filter = query.map(|Query(f)| f).unwrap_or_else(|rejection| {
        warn!("ignoring malformed rental filter: {}", rejection.body_text());
        RentalFilter::default()
    });
    Ok(Json(state.repo.list_rentals(&filter).await?))
}

/// Close, extend or annotate a rental.
#[utoipa::path(
    patch,
    path = "/rentals/{id}",
    tag = "Rentals",
    params(("id" = String, Path, description = "Rental ID")),
    request_body = RentalUpdate,
    responses(
        (status = 200, description = "Updated record", body = Rental),
        (status = 400, description = "Malformed or empty update", body = ErrorBody),
        (status = 404, description = "Unknown rental", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub(crate) async fn update_rental(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<RentalUpdate>, JsonRejection>,
) -> Result<Json<Rental>, ApiError> {
    let Json(update) = body?;
    let rental = state.repo.update_rental(&id, &update).await?;
    info!(rental_id = %id, status = %rental.status, "rental updated");
    Ok(Json(rental))
}
