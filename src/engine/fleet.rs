use chrono::Utc;
use dashmap::mapref::entry::Entry;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::vehicle::Vehicle;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub capacity: u32,
    pub registration_number: String,
}

impl VehicleDetails {
    fn validate(&self) -> Result<(), AppError> {
        if self.kind.trim().is_empty() {
            return Err(AppError::BadRequest("type cannot be empty".to_string()));
        }
        if self.capacity == 0 {
            return Err(AppError::BadRequest("capacity must be > 0".to_string()));
        }
        if self.registration_number.trim().is_empty() {
            return Err(AppError::BadRequest(
                "registration_number cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn registration_key(registration_number: &str) -> String {
    registration_number.trim().to_uppercase()
}

fn not_owned(vehicle_id: Uuid) -> AppError {
    AppError::NotFound(format!("vehicle {vehicle_id} not found or not owned by the driver"))
}

fn claim_registration(state: &AppState, key: String, vehicle_id: Uuid) -> Result<(), AppError> {
    match state.registrations.entry(key) {
        Entry::Occupied(existing) if *existing.get() != vehicle_id => Err(AppError::Conflict(
            format!("registration number {} is already registered", existing.key()),
        )),
        Entry::Occupied(_) => Ok(()),
        Entry::Vacant(slot) => {
            slot.insert(vehicle_id);
            Ok(())
        }
    }
}

pub fn register_vehicle(
    state: &AppState,
    driver: Uuid,
    details: VehicleDetails,
) -> Result<Vehicle, AppError> {
    details.validate()?;

    let id = Uuid::new_v4();
    claim_registration(state, registration_key(&details.registration_number), id)?;

    let now = Utc::now();
    let vehicle = Vehicle {
        id,
        driver: Some(driver),
        kind: details.kind.trim().to_string(),
        capacity: details.capacity,
        registration_number: details.registration_number.trim().to_string(),
        available: true,
        created_at: now,
        updated_at: now,
    };

    state.vehicles.insert(vehicle.id, vehicle.clone());
    state.metrics.vehicles_registered.inc();

    info!(vehicle_id = %vehicle.id, driver_id = %driver, kind = %vehicle.kind, "vehicle registered");

    Ok(vehicle)
}

pub fn update_vehicle(
    state: &AppState,
    driver: Uuid,
    vehicle_id: Uuid,
    details: VehicleDetails,
) -> Result<Vehicle, AppError> {
    details.validate()?;

    let mut vehicle = state
        .vehicles
        .get_mut(&vehicle_id)
        .filter(|vehicle| vehicle.is_driven_by(driver))
        .ok_or_else(|| not_owned(vehicle_id))?;

    let old_key = registration_key(&vehicle.registration_number);
    let new_key = registration_key(&details.registration_number);
    if old_key != new_key {
        claim_registration(state, new_key, vehicle_id)?;
        state.registrations.remove(&old_key);
    }

    vehicle.kind = details.kind.trim().to_string();
    vehicle.capacity = details.capacity;
    vehicle.registration_number = details.registration_number.trim().to_string();
    vehicle.updated_at = Utc::now();

    Ok(vehicle.clone())
}

pub fn set_availability(
    state: &AppState,
    driver: Uuid,
    vehicle_id: Uuid,
    available: bool,
) -> Result<Vehicle, AppError> {
    let mut vehicle = state
        .vehicles
        .get_mut(&vehicle_id)
        .filter(|vehicle| vehicle.is_driven_by(driver))
        .ok_or_else(|| not_owned(vehicle_id))?;

    vehicle.available = available;
    vehicle.updated_at = Utc::now();

    Ok(vehicle.clone())
}

pub fn delete_vehicle(state: &AppState, driver: Uuid, vehicle_id: Uuid) -> Result<(), AppError> {
    let (_, vehicle) = state
        .vehicles
        .remove_if(&vehicle_id, |_, vehicle| vehicle.is_driven_by(driver))
        .ok_or_else(|| not_owned(vehicle_id))?;

    state
        .registrations
        .remove(&registration_key(&vehicle.registration_number));
    state.metrics.vehicles_registered.dec();

    info!(vehicle_id = %vehicle_id, driver_id = %driver, "vehicle deleted");

    Ok(())
}

/// Hands a vehicle to `driver`, or detaches it from any driver when `None`.
/// A vehicle that already has a driver can only be handed over by that driver.
pub fn assign_driver(
    state: &AppState,
    caller: Uuid,
    vehicle_id: Uuid,
    driver: Option<Uuid>,
) -> Result<Vehicle, AppError> {
    let mut vehicle = state
        .vehicles
        .get_mut(&vehicle_id)
        .ok_or_else(|| AppError::NotFound(format!("vehicle {vehicle_id} not found")))?;

    if vehicle.driver.is_some_and(|current| current != caller) {
        warn!(vehicle_id = %vehicle_id, caller_id = %caller, "rejected vehicle reassignment");
        return Err(AppError::Forbidden(format!(
            "vehicle {vehicle_id} is assigned to another driver"
        )));
    }

    vehicle.driver = driver;
    vehicle.updated_at = Utc::now();

    info!(
        vehicle_id = %vehicle_id,
        caller_id = %caller,
        driver_id = ?driver,
        "vehicle driver assignment changed"
    );

    Ok(vehicle.clone())
}

pub fn matches_keyword(vehicle: &Vehicle, keyword: &str) -> bool {
    let keyword = keyword.trim().to_lowercase();
    vehicle.kind.to_lowercase().contains(&keyword)
        || vehicle.registration_number.to_lowercase().contains(&keyword)
}
