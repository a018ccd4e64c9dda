//! Vendo Core — domain models, repository trait definitions, and the
//! error taxonomy shared across all crates.
//!
//! Every repository operation on an owned entity takes a required
//! `vendor_id` parameter; a scope-less read or mutation is not
//! representable through these APIs.

pub mod context;
pub mod error;
pub mod models;
pub mod repository;

pub use context::TenantContext;
pub use error::{FieldViolation, VendoError, VendoResult};
