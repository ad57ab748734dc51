use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub driver: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: String,
    pub capacity: u32,
    pub registration_number: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn is_driven_by(&self, driver: Uuid) -> bool {
        self.driver == Some(driver)
    }
}
