//! Dining table domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: Uuid,
    pub vendor_id: Uuid,
    /// Unique per vendor.
    pub name: String,
    pub capacity: u32,
    pub is_occupied: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDiningTable {
    pub vendor_id: Uuid,
    pub name: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDiningTable {
    pub name: Option<String>,
    pub capacity: Option<u32>,
}
