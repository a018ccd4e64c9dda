//! Billing contract shapes.
//!
//! A draft carries only item references, quantities, and the
//! field-driven adjustments. Names, prices, and every total are
//! denormalized from the vendor's menu server-side.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;
use vendo_core::models::bill::PaymentMethod;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BillLineDraft {
    pub item_id: Uuid,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BillDraft {
    pub customer_id: Option<Uuid>,
    #[validate(length(min = 1, message = "at least one line is required"), nested)]
    pub lines: Vec<BillLineDraft>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    #[serde(default)]
    pub discount: f64,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    #[serde(default)]
    pub extra_charges: f64,
    pub payment_method: PaymentMethod,
}
