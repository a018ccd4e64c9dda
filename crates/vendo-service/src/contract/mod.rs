//! API contract layer: transport-independent input shapes.
//!
//! Each DTO declares exactly the fields an operation accepts. Identity,
//! timestamps, status, and vendor ids are server-assigned and simply do
//! not exist on these types, so anything a client sends for them is
//! dropped during deserialization. Validation runs before any store
//! access and short-circuits with field-level violations.

mod billing;
mod catalog;
mod customer;
mod loyalty;
mod operations;
mod profile;

pub use billing::{BillDraft, BillLineDraft};
pub use catalog::{InventoryItemDraft, InventoryItemPatch, MenuItemDraft, MenuItemPatch, StockAdjustment};
pub use customer::{CustomerDraft, CustomerPatch};
pub use loyalty::{PointGrant, RedeemRequest, RewardDraft, RewardPatch};
pub use operations::{AttendanceEntry, ExpenseDraft, StaffDraft, StaffPatch, TableDraft, TablePatch};
pub use profile::{ProfileDraft, ProfilePatch};

use validator::{Validate, ValidationErrors, ValidationErrorsKind};
use vendo_core::error::{FieldViolation, VendoError, VendoResult};

/// Validate a contract input, mapping failures into the core error
/// taxonomy. Nothing is applied on failure.
pub fn check<T: Validate>(input: &T) -> VendoResult<()> {
    input.validate().map_err(|errs| {
        let mut violations = Vec::new();
        collect("", &errs, &mut violations);
        VendoError::Validation { violations }
    })
}

fn collect(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    out.push(FieldViolation {
                        field: path.clone(),
                        message: err
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| err.code.to_string()),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(&path, nested, out),
            ValidationErrorsKind::List(entries) => {
                for (index, nested) in entries {
                    collect(&format!("{path}[{index}]"), nested, out);
                }
            }
        }
    }
}
