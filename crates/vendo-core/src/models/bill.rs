//! Bill domain model.
//!
//! Line items are denormalized at write time from the vendor's menu —
//! name and price always come from the store, never from client input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    Other,
}

/// One denormalized bill line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillItem {
    pub item_id: Uuid,
    pub name: String,
    pub quantity: u32,
    /// Unit price at the time of sale.
    pub price: f64,
    /// `quantity * price`.
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub items: Vec<BillItem>,
    /// Sum of line totals.
    pub total_amount: f64,
    pub discount: f64,
    pub extra_charges: f64,
    /// Always `total_amount - discount + extra_charges`, recomputed
    /// server-side.
    pub final_amount: f64,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBill {
    pub vendor_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub items: Vec<BillItem>,
    pub total_amount: f64,
    pub discount: f64,
    pub extra_charges: f64,
    pub final_amount: f64,
    pub payment_method: PaymentMethod,
}

/// Inventory decrement executed atomically with bill creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockDeduction {
    pub inventory_item_id: Uuid,
    pub quantity: f64,
}

/// The bill total invariant: `total - discount + extra_charges`.
pub fn final_amount(total_amount: f64, discount: f64, extra_charges: f64) -> f64 {
    total_amount - discount + extra_charges
}

#[cfg(test)]
mod tests {
    use super::final_amount;

    #[test]
    fn final_amount_invariant() {
        assert_eq!(final_amount(100.0, 0.0, 0.0), 100.0);
        assert_eq!(final_amount(100.0, 10.0, 0.0), 90.0);
        assert_eq!(final_amount(100.0, 10.0, 5.0), 95.0);
        assert_eq!(final_amount(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn final_amount_holds_for_non_negative_grid() {
        for total in [0.0, 1.0, 49.5, 1000.0] {
            for discount in [0.0, 0.5, 49.5] {
                for extra in [0.0, 2.5, 18.0] {
                    let f = final_amount(total, discount, extra);
                    assert!((f - (total - discount + extra)).abs() < f64::EPSILON);
                }
            }
        }
    }
}
