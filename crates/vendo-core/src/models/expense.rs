//! Expense domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub category: String,
    pub amount: f64,
    pub note: Option<String>,
    pub incurred_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExpense {
    pub vendor_id: Uuid,
    pub category: String,
    pub amount: f64,
    pub note: Option<String>,
    pub incurred_on: NaiveDate,
}
