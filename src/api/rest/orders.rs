use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::rest::extract::{ApiJson, Identity};
use crate::engine::lifecycle;
use crate::engine::placement::{self, NewOrder};
use crate::error::AppError;
use crate::geo::GeoPoint;
use crate::models::order::{Order, OrderStatus};
use crate::pricing::{DeliveryEstimate, DeliverySpeed, PackageSize};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/estimate", post(estimate_order))
        .route("/orders/customer", get(customer_orders))
        .route("/orders/driver", get(driver_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/accept", put(accept_order))
        .route("/orders/:id/decline", put(decline_order))
        .route("/orders/:id/status", put(update_status))
        .route("/orders/:id/delivery-speed", put(change_delivery_speed))
        .route("/orders/:id/tracking", put(record_location))
}

#[derive(Deserialize)]
pub struct EstimateRequest {
    pub pickup: GeoPoint,
    pub delivery: GeoPoint,
    pub size: PackageSize,
    pub delivery_speed: DeliverySpeed,
}

#[derive(Deserialize)]
pub struct AcceptRequest {
    pub vehicle_id: Uuid,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

#[derive(Deserialize)]
pub struct SpeedRequest {
    pub delivery_speed: DeliverySpeed,
}

#[derive(Deserialize)]
pub struct LocationRequest {
    pub location: GeoPoint,
}

fn collect_sorted(state: &AppState, keep: impl Fn(&Order) -> bool) -> Vec<Order> {
    let mut orders: Vec<Order> = state
        .orders
        .iter()
        .filter(|entry| keep(entry.value()))
        .map(|entry| entry.value().clone())
        .collect();
    orders.sort_by_key(|order| order.created_at);
    orders
}

async fn estimate_order(
    _caller: Identity,
    ApiJson(payload): ApiJson<EstimateRequest>,
) -> Result<Json<DeliveryEstimate>, AppError> {
    let estimate = placement::quote(
        &payload.pickup,
        &payload.delivery,
        payload.size,
        payload.delivery_speed,
    )?;
    Ok(Json(estimate))
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Identity(customer): Identity,
    ApiJson(payload): ApiJson<NewOrder>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = placement::place_order(&state, customer, payload)?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    _caller: Identity,
) -> Json<Vec<Order>> {
    Json(collect_sorted(&state, |_| true))
}

async fn customer_orders(
    State(state): State<Arc<AppState>>,
    Identity(customer): Identity,
) -> Json<Vec<Order>> {
    Json(collect_sorted(&state, |order| order.customer == customer))
}

async fn driver_orders(
    State(state): State<Arc<AppState>>,
    Identity(driver): Identity,
) -> Json<Vec<Order>> {
    Json(collect_sorted(&state, |order| order.driver == Some(driver)))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    _caller: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("order {} not found", id)))?;

    Ok(Json(order.value().clone()))
}

async fn accept_order(
    State(state): State<Arc<AppState>>,
    Identity(driver): Identity,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<AcceptRequest>,
) -> Result<Json<Order>, AppError> {
    lifecycle::accept_order(&state, driver, id, payload.vehicle_id).map(Json)
}

async fn decline_order(
    State(state): State<Arc<AppState>>,
    Identity(driver): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    lifecycle::decline_order(&state, driver, id).map(Json)
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Identity(caller): Identity,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<StatusRequest>,
) -> Result<Json<Order>, AppError> {
    lifecycle::update_status(&state, caller, id, payload.status).map(Json)
}

async fn change_delivery_speed(
    State(state): State<Arc<AppState>>,
    Identity(customer): Identity,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<SpeedRequest>,
) -> Result<Json<Order>, AppError> {
    lifecycle::change_delivery_speed(&state, customer, id, payload.delivery_speed).map(Json)
}

async fn record_location(
    State(state): State<Arc<AppState>>,
    Identity(driver): Identity,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<LocationRequest>,
) -> Result<Json<Order>, AppError> {
    lifecycle::record_location(&state, driver, id, payload.location).map(Json)
}
