use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::geo::GeoPoint;
use crate::models::order::{Order, OrderStatus};
use crate::pricing::{DeliverySpeed, delivery_cost};
use crate::state::AppState;

/// Whether `to` may follow `from` through an explicit status update.
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    match to {
        OrderStatus::InTransit => from == OrderStatus::Accepted,
        OrderStatus::Delivered => from == OrderStatus::InTransit,
        OrderStatus::Cancelled => !from.is_terminal(),
        OrderStatus::Pending | OrderStatus::Accepted | OrderStatus::Declined => false,
    }
}

fn not_found(order_id: Uuid) -> AppError {
    AppError::NotFound(format!("order {order_id} not found"))
}

fn record_transition(state: &AppState, order: &Order) {
    state
        .metrics
        .order_transitions_total
        .with_label_values(&[order.status.as_str()])
        .inc();
}

pub fn accept_order(
    state: &AppState,
    driver: Uuid,
    order_id: Uuid,
    vehicle_id: Uuid,
) -> Result<Order, AppError> {
    let vehicle_ready = state
        .vehicles
        .get(&vehicle_id)
        .map(|vehicle| vehicle.is_driven_by(driver) && vehicle.available)
        .unwrap_or(false);

    if !vehicle_ready {
        return Err(AppError::BadRequest(
            "vehicle not found or not available".to_string(),
        ));
    }

    let mut order = state.orders.get_mut(&order_id).ok_or_else(|| not_found(order_id))?;

    if !matches!(order.status, OrderStatus::Pending | OrderStatus::Declined) {
        warn!(order_id = %order_id, status = order.status.as_str(), "order cannot be accepted");
        return Err(AppError::Conflict(format!(
            "order {order_id} is already {}",
            order.status.as_str()
        )));
    }

    order.driver = Some(driver);
    order.vehicle = Some(vehicle_id);
    order.status = OrderStatus::Accepted;
    order.updated_at = Utc::now();
    let accepted = order.clone();
    drop(order);

    record_transition(state, &accepted);
    info!(order_id = %order_id, driver_id = %driver, vehicle_id = %vehicle_id, "order accepted");

    Ok(accepted)
}

pub fn decline_order(state: &AppState, driver: Uuid, order_id: Uuid) -> Result<Order, AppError> {
    let mut order = state.orders.get_mut(&order_id).ok_or_else(|| not_found(order_id))?;

    if order.driver.is_some_and(|assigned| assigned != driver) {
        return Err(AppError::Forbidden(
            "order is assigned to another driver".to_string(),
        ));
    }

    if !matches!(order.status, OrderStatus::Pending | OrderStatus::Accepted) {
        warn!(order_id = %order_id, status = order.status.as_str(), "order cannot be declined");
        return Err(AppError::Conflict(format!(
            "order {order_id} is {} and cannot be declined",
            order.status.as_str()
        )));
    }

    order.driver = None;
    order.vehicle = None;
    order.status = OrderStatus::Declined;
    order.updated_at = Utc::now();
    let declined = order.clone();
    drop(order);

    record_transition(state, &declined);
    info!(order_id = %order_id, driver_id = %driver, "order declined");

    Ok(declined)
}

pub fn update_status(
    state: &AppState,
    caller: Uuid,
    order_id: Uuid,
    target: OrderStatus,
) -> Result<Order, AppError> {
    if !matches!(
        target,
        OrderStatus::InTransit | OrderStatus::Delivered | OrderStatus::Cancelled
    ) {
        return Err(AppError::BadRequest(format!(
            "invalid status {}, expected in-transit, delivered or cancelled",
            target.as_str()
        )));
    }

    let mut order = state.orders.get_mut(&order_id).ok_or_else(|| not_found(order_id))?;

    let is_driver = order.driver == Some(caller);
    let permitted = match target {
        OrderStatus::Cancelled => is_driver || order.customer == caller,
        _ => is_driver,
    };
    if !permitted {
        return Err(AppError::Forbidden(format!(
            "not allowed to mark order {order_id} as {}",
            target.as_str()
        )));
    }

    if !can_transition(order.status, target) {
        warn!(
            order_id = %order_id,
            from = order.status.as_str(),
            to = target.as_str(),
            "rejected status transition"
        );
        return Err(AppError::Conflict(format!(
            "order {order_id} cannot move from {} to {}",
            order.status.as_str(),
            target.as_str()
        )));
    }

    order.status = target;
    order.updated_at = Utc::now();
    let updated = order.clone();
    drop(order);

    record_transition(state, &updated);
    info!(order_id = %order_id, status = target.as_str(), "order status updated");

    Ok(updated)
}

pub fn record_location(
    state: &AppState,
    driver: Uuid,
    order_id: Uuid,
    location: GeoPoint,
) -> Result<Order, AppError> {
    location.validate()?;

    let mut order = state.orders.get_mut(&order_id).ok_or_else(|| not_found(order_id))?;

    if order.driver != Some(driver) {
        return Err(AppError::Forbidden(
            "only the assigned driver can report locations".to_string(),
        ));
    }

    if !matches!(order.status, OrderStatus::Accepted | OrderStatus::InTransit) {
        return Err(AppError::Conflict(format!(
            "order {order_id} is {} and is not being tracked",
            order.status.as_str()
        )));
    }

    let now = Utc::now();
    order.tracking.record(location, now);
    order.updated_at = now;

    Ok(order.clone())
}

pub fn change_delivery_speed(
    state: &AppState,
    customer: Uuid,
    order_id: Uuid,
    speed: DeliverySpeed,
) -> Result<Order, AppError> {
    let mut order = state.orders.get_mut(&order_id).ok_or_else(|| not_found(order_id))?;

    if order.customer != customer {
        return Err(AppError::Forbidden(
            "only the customer can change the delivery speed".to_string(),
        ));
    }

    if order.status != OrderStatus::Pending {
        return Err(AppError::Conflict(format!(
            "order {order_id} is {}; speed can only change while pending",
            order.status.as_str()
        )));
    }

    order.delivery_speed = speed;
    order.cost = delivery_cost(order.distance_km, order.package.size, speed);
    order.updated_at = Utc::now();

    info!(order_id = %order_id, speed = speed.as_str(), cost = order.cost, "delivery speed changed");

    Ok(order.clone())
}
