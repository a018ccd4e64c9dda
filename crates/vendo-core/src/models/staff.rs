//! Staff and attendance domain models.
//!
//! Attendance entries are child entities scoped through their staff
//! record, the same way loyalty points are scoped through customers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    pub role: String,
    pub phone: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStaff {
    pub vendor_id: Uuid,
    pub name: String,
    pub role: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStaff {
    pub name: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
    Leave,
}

/// One attendance entry per staff member per day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffAttendance {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub day: NaiveDate,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStaffAttendance {
    pub staff_id: Uuid,
    pub day: NaiveDate,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}
