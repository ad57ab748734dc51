use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post, put};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::rest::extract::{ApiJson, Identity};
use crate::engine::fleet::{self, VehicleDetails};
use crate::error::AppError;
use crate::models::vehicle::Vehicle;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/vehicles", post(register_vehicle))
        .route("/vehicles/mine", get(my_vehicles))
        .route("/vehicles/available", get(available_vehicles))
        .route("/vehicles/search", get(search_vehicles))
        .route("/vehicles/type/:kind", get(vehicles_by_type))
        .route(
            "/vehicles/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
        .route("/vehicles/:id/availability", patch(set_availability))
        .route("/vehicles/:id/driver", put(assign_driver).delete(remove_driver))
}

#[derive(Deserialize)]
pub struct AvailabilityRequest {
    pub available: bool,
}

#[derive(Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: Uuid,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub keyword: String,
}

fn collect_sorted(state: &AppState, keep: impl Fn(&Vehicle) -> bool) -> Vec<Vehicle> {
    let mut vehicles: Vec<Vehicle> = state
        .vehicles
        .iter()
        .filter(|entry| keep(entry.value()))
        .map(|entry| entry.value().clone())
        .collect();
    vehicles.sort_by_key(|vehicle| vehicle.created_at);
    vehicles
}

async fn register_vehicle(
    State(state): State<Arc<AppState>>,
    Identity(driver): Identity,
    ApiJson(payload): ApiJson<VehicleDetails>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    let vehicle = fleet::register_vehicle(&state, driver, payload)?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

async fn my_vehicles(
    State(state): State<Arc<AppState>>,
    Identity(driver): Identity,
) -> Json<Vec<Vehicle>> {
    Json(collect_sorted(&state, |vehicle| vehicle.is_driven_by(driver)))
}

async fn available_vehicles(
    State(state): State<Arc<AppState>>,
    _caller: Identity,
) -> Json<Vec<Vehicle>> {
    Json(collect_sorted(&state, |vehicle| vehicle.available))
}

async fn search_vehicles(
    State(state): State<Arc<AppState>>,
    _caller: Identity,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Vehicle>> {
    Json(collect_sorted(&state, |vehicle| {
        fleet::matches_keyword(vehicle, &query.keyword)
    }))
}

async fn vehicles_by_type(
    State(state): State<Arc<AppState>>,
    _caller: Identity,
    Path(kind): Path<String>,
) -> Json<Vec<Vehicle>> {
    Json(collect_sorted(&state, |vehicle| {
        vehicle.kind.eq_ignore_ascii_case(&kind)
    }))
}

async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    _caller: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<Vehicle>, AppError> {
    let vehicle = state
        .vehicles
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("vehicle {} not found", id)))?;

    Ok(Json(vehicle.value().clone()))
}

async fn update_vehicle(
    State(state): State<Arc<AppState>>,
    Identity(driver): Identity,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<VehicleDetails>,
) -> Result<Json<Vehicle>, AppError> {
    fleet::update_vehicle(&state, driver, id, payload).map(Json)
}

async fn set_availability(
    State(state): State<Arc<AppState>>,
    Identity(driver): Identity,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<AvailabilityRequest>,
) -> Result<Json<Vehicle>, AppError> {
    fleet::set_availability(&state, driver, id, payload.available).map(Json)
}

async fn delete_vehicle(
    State(state): State<Arc<AppState>>,
    Identity(driver): Identity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    fleet::delete_vehicle(&state, driver, id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn assign_driver(
    State(state): State<Arc<AppState>>,
    Identity(caller): Identity,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<AssignDriverRequest>,
) -> Result<Json<Vehicle>, AppError> {
    fleet::assign_driver(&state, caller, id, Some(payload.driver_id)).map(Json)
}

async fn remove_driver(
    State(state): State<Arc<AppState>>,
    Identity(caller): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<Vehicle>, AppError> {
    fleet::assign_driver(&state, caller, id, None).map(Json)
}
