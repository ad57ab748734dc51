use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::GeoPoint;
use crate::pricing::{DeliverySpeed, PackageSize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Accepted,
    InTransit,
    Delivered,
    Cancelled,
    Declined,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::InTransit => "in-transit",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Declined => "declined",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDetails {
    pub size: PackageSize,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    pub address: Option<String>,
    pub location: GeoPoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingEntry {
    pub location: GeoPoint,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tracking {
    pub current_location: GeoPoint,
    pub history: Vec<TrackingEntry>,
}

impl Tracking {
    pub fn starting_at(location: GeoPoint, timestamp: DateTime<Utc>) -> Self {
        Self {
            current_location: location,
            history: vec![TrackingEntry {
                location,
                timestamp,
            }],
        }
    }

    pub fn record(&mut self, location: GeoPoint, timestamp: DateTime<Utc>) {
        self.current_location = location;
        self.history.push(TrackingEntry {
            location,
            timestamp,
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer: Uuid,
    pub driver: Option<Uuid>,
    pub vehicle: Option<Uuid>,
    pub package: PackageDetails,
    pub pickup: GeoPoint,
    pub destination: Destination,
    pub distance_km: f64,
    pub delivery_speed: DeliverySpeed,
    pub cost: f64,
    pub status: OrderStatus,
    pub tracking: Tracking,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
