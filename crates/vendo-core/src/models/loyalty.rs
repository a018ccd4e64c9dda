//! Loyalty domain models: rewards owned by a vendor, and point entries
//! keyed by customer.
//!
//! Loyalty points are child entities: they carry no `vendor_id` of their
//! own and inherit tenant scope through the customer chain. Every access
//! must validate that the customer belongs to the calling vendor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyReward {
    pub id: Uuid,
    pub vendor_id: Uuid,
    /// Unique per vendor.
    pub name: String,
    pub description: Option<String>,
    pub points_required: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLoyaltyReward {
    pub vendor_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub points_required: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLoyaltyReward {
    pub name: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub description: Option<Option<String>>,
    pub points_required: Option<u32>,
    pub is_active: Option<bool>,
}

/// A signed point entry. Positive for accrual, negative for redemption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyPoint {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub points: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLoyaltyPoint {
    pub customer_id: Uuid,
    pub points: i64,
    pub reason: String,
}
