use dashmap::DashMap;
use uuid::Uuid;

use crate::models::order::Order;
use crate::models::vehicle::Vehicle;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub orders: DashMap<Uuid, Order>,
    pub vehicles: DashMap<Uuid, Vehicle>,
    /// Normalized registration number to vehicle id.
    pub registrations: DashMap<String, Uuid>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
            vehicles: DashMap::new(),
            registrations: DashMap::new(),
            metrics: Metrics::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
