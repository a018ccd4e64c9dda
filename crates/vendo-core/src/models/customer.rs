//! Customer domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    /// Unique per vendor.
    pub phone: String,
    pub email: Option<String>,
    pub notes: Option<String>,
    /// Number of recorded visits. Starts at 0.
    pub visit_count: u32,
    /// Lifetime spend across all recorded visits.
    pub total_spent: f64,
    pub last_visit_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a customer. `vendor_id` is stamped by the
/// service layer from the request context, never taken from client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomer {
    pub vendor_id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub phone: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub email: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}
