//! Tables, staff, attendance, and expense contract shapes.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;
use vendo_core::models::staff::AttendanceStatus;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TableDraft {
    #[validate(length(min = 1, max = 60, message = "must be 1-60 characters"))]
    pub name: String,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub capacity: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TablePatch {
    #[validate(length(min = 1, max = 60, message = "must be 1-60 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StaffDraft {
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 60, message = "must be 1-60 characters"))]
    pub role: String,
    #[validate(length(min = 7, max = 15, message = "must be 7-15 digits"))]
    pub phone: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StaffPatch {
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 60, message = "must be 1-60 characters"))]
    pub role: Option<String>,
    #[validate(length(min = 7, max = 15, message = "must be 7-15 digits"))]
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AttendanceEntry {
    pub staff_id: Uuid,
    pub day: NaiveDate,
    pub status: AttendanceStatus,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExpenseDraft {
    #[validate(length(min = 1, max = 60, message = "must be 1-60 characters"))]
    pub category: String,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub amount: f64,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub note: Option<String>,
    pub incurred_on: NaiveDate,
}
