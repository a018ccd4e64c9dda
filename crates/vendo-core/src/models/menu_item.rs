//! Menu item domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: Uuid,
    pub vendor_id: Uuid,
    /// Unique per vendor.
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: f64,
    pub is_available: bool,
    /// Optional link to an inventory item: each unit sold decrements one
    /// unit of stock when a bill is created.
    pub inventory_item_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMenuItem {
    pub vendor_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: f64,
    pub inventory_item_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMenuItem {
    pub name: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub description: Option<Option<String>>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub is_available: Option<bool>,
    pub inventory_item_id: Option<Option<Uuid>>,
}
