//! Error types for the Vendo system.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::profile::OnboardingStatus;

/// A single failed input field, reported by the contract layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error)]
pub enum VendoError {
    /// Entity absent or outside the caller's tenant scope. The two cases
    /// are deliberately indistinguishable so existence never leaks across
    /// tenants.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Validation failed: {}", format_violations(.violations))]
    Validation { violations: Vec<FieldViolation> },

    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    /// No valid authenticated subject.
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated but lacking the required role.
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// Onboarding gate: the vendor exists but is not yet approved.
    /// Distinct from an authentication failure.
    #[error("Vendor not approved (status: {status:?})")]
    NotApproved { status: OnboardingStatus },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl VendoError {
    /// Single-field validation failure.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        VendoError::Validation {
            violations: vec![FieldViolation {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        VendoError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

pub type VendoResult<T> = Result<T, VendoError>;
