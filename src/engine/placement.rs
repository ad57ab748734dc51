use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::geo::GeoPoint;
use crate::models::order::{Destination, Order, OrderStatus, PackageDetails, Tracking};
use crate::pricing::{DeliveryEstimate, DeliverySpeed, PackageSize, estimate};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub package: PackageDetails,
    pub pickup: GeoPoint,
    pub destination: Destination,
    pub delivery_speed: DeliverySpeed,
    pub vehicle_id: Option<Uuid>,
}

/// Prices a route without recording anything.
pub fn quote(
    pickup: &GeoPoint,
    delivery: &GeoPoint,
    size: PackageSize,
    speed: DeliverySpeed,
) -> Result<DeliveryEstimate, AppError> {
    pickup.validate()?;
    delivery.validate()?;

    Ok(estimate(pickup, delivery, size, speed))
}

pub fn place_order(state: &AppState, customer: Uuid, new_order: NewOrder) -> Result<Order, AppError> {
    let weight = new_order.package.weight;
    if !weight.is_finite() || weight < 0.0 {
        return Err(AppError::BadRequest(
            "package weight must be a non-negative number".to_string(),
        ));
    }

    let DeliveryEstimate { distance_km, cost } = quote(
        &new_order.pickup,
        &new_order.destination.location,
        new_order.package.size,
        new_order.delivery_speed,
    )?;

    if let Some(vehicle_id) = new_order.vehicle_id {
        if !state.vehicles.contains_key(&vehicle_id) {
            return Err(AppError::NotFound(format!("vehicle {vehicle_id} not found")));
        }
    }

    let now = Utc::now();
    let order = Order {
        id: Uuid::new_v4(),
        customer,
        driver: None,
        vehicle: new_order.vehicle_id,
        package: new_order.package,
        pickup: new_order.pickup,
        destination: new_order.destination,
        distance_km,
        delivery_speed: new_order.delivery_speed,
        cost,
        status: OrderStatus::Pending,
        tracking: Tracking::starting_at(new_order.pickup, now),
        created_at: now,
        updated_at: now,
    };

    state.orders.insert(order.id, order.clone());

    state
        .metrics
        .orders_placed_total
        .with_label_values(&[order.package.size.as_str(), order.delivery_speed.as_str()])
        .inc();
    state.metrics.order_distance_km.observe(distance_km);
    state.metrics.order_cost.observe(cost);

    info!(
        order_id = %order.id,
        customer_id = %customer,
        distance_km,
        cost,
        "order placed"
    );

    Ok(order)
}
