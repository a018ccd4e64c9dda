//! Menu and inventory contract shapes.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MenuItemDraft {
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 60, message = "must be 1-60 characters"))]
    pub category: String,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: f64,
    pub inventory_item_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MenuItemPatch {
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 60, message = "must be 1-60 characters"))]
    pub category: Option<String>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: Option<f64>,
    pub is_available: Option<bool>,
    pub inventory_item_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InventoryItemDraft {
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "must be 1-20 characters"))]
    pub unit: String,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub stock: f64,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    #[serde(default)]
    pub low_stock_threshold: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct InventoryItemPatch {
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20, message = "must be 1-20 characters"))]
    pub unit: Option<String>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub low_stock_threshold: Option<f64>,
}

/// Signed stock correction (restock or wastage write-off).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StockAdjustment {
    pub delta: f64,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub reason: Option<String>,
}
