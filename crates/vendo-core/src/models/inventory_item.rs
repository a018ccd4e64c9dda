//! Inventory item domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub vendor_id: Uuid,
    /// Unique per vendor.
    pub name: String,
    /// Unit label shown to the vendor (e.g. `kg`, `pcs`, `l`).
    pub unit: String,
    /// Current stock level. Never negative; the storage layer enforces
    /// this so a decrement below zero rolls back the whole transaction.
    pub stock: f64,
    pub low_stock_threshold: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInventoryItem {
    pub vendor_id: Uuid,
    pub name: String,
    pub unit: String,
    pub stock: f64,
    pub low_stock_threshold: f64,
}

/// Stock is adjusted through `adjust_stock`, not through update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInventoryItem {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub low_stock_threshold: Option<f64>,
}
