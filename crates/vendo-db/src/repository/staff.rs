//! SurrealDB implementations of [`StaffRepository`] and
//! [`StaffAttendanceRepository`].
//!
//! Attendance entries inherit tenant scope through the staff chain;
//! a chain miss reports as the staff member not being found.

use chrono::{DateTime, NaiveDate, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vendo_core::error::VendoResult;
use vendo_core::models::staff::{
    AttendanceStatus, CreateStaff, CreateStaffAttendance, Staff, StaffAttendance, UpdateStaff,
};
use vendo_core::repository::{
    PaginatedResult, Pagination, StaffAttendanceRepository, StaffRepository,
};

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct StaffRow {
    vendor_id: String,
    name: String,
    role: String,
    phone: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct StaffRowWithId {
    record_id: String,
    vendor_id: String,
    name: String,
    role: String,
    phone: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StaffRow {
    fn into_staff(self, id: Uuid) -> Result<Staff, DbError> {
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        Ok(Staff {
            id,
            vendor_id,
            name: self.name,
            role: self.role,
            phone: self.phone,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl StaffRowWithId {
    fn try_into_staff(self) -> Result<Staff, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        Ok(Staff {
            id,
            vendor_id,
            name: self.name,
            role: self.role,
            phone: self.phone,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Staff repository.
#[derive(Clone)]
pub struct SurrealStaffRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealStaffRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> StaffRepository for SurrealStaffRepository<C> {
    async fn create(&self, input: CreateStaff) -> VendoResult<Staff> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('staff', $id) SET \
                 vendor_id = $vendor_id, \
                 name = $name, role = $role, phone = $phone, \
                 is_active = true",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", input.vendor_id.to_string()))
            .bind(("name", input.name))
            .bind(("role", input.role))
            .bind(("phone", input.phone))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<StaffRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "staff".into(),
            id: id_str,
        })?;

        Ok(row.into_staff(id)?)
    }

    async fn get(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<Staff> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('staff', $id) \
                 WHERE vendor_id = $vendor_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<StaffRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "staff".into(),
            id: id_str,
        })?;

        Ok(row.into_staff(id)?)
    }

    async fn update(&self, vendor_id: Uuid, id: Uuid, input: UpdateStaff) -> VendoResult<Staff> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.role.is_some() {
            sets.push("role = $role");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('staff', $id) SET {} \
             WHERE vendor_id = $vendor_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(role) = input.role {
            builder = builder.bind(("role", role));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(is_active) = input.is_active {
            builder = builder.bind(("is_active", is_active));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<StaffRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "staff".into(),
            id: id_str,
        })?;

        Ok(row.into_staff(id)?)
    }

    async fn delete(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "DELETE type::record('staff', $id) \
                 WHERE vendor_id = $vendor_id RETURN BEFORE",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<StaffRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "staff".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn list(
        &self,
        vendor_id: Uuid,
        pagination: Pagination,
    ) -> VendoResult<PaginatedResult<Staff>> {
        let vendor_id_str = vendor_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM staff \
                 WHERE vendor_id = $vendor_id GROUP ALL",
            )
            .bind(("vendor_id", vendor_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM staff \
                 WHERE vendor_id = $vendor_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("vendor_id", vendor_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<StaffRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_staff())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

// -----------------------------------------------------------------------
// Attendance (child scope via staff)
// -----------------------------------------------------------------------

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct AttendanceRow {
    staff_id: String,
    day: String,
    status: String,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct AttendanceRowWithId {
    record_id: String,
    staff_id: String,
    day: String,
    status: String,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

fn parse_attendance_status(s: &str) -> Result<AttendanceStatus, DbError> {
    match s {
        "Present" => Ok(AttendanceStatus::Present),
        "Absent" => Ok(AttendanceStatus::Absent),
        "HalfDay" => Ok(AttendanceStatus::HalfDay),
        "Leave" => Ok(AttendanceStatus::Leave),
        other => Err(DbError::Migration(format!(
            "unknown attendance status: {other}"
        ))),
    }
}

fn attendance_status_to_string(s: AttendanceStatus) -> &'static str {
    match s {
        AttendanceStatus::Present => "Present",
        AttendanceStatus::Absent => "Absent",
        AttendanceStatus::HalfDay => "HalfDay",
        AttendanceStatus::Leave => "Leave",
    }
}

fn parse_day(s: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DbError::Migration(format!("invalid attendance day: {e}")))
}

impl AttendanceRow {
    fn into_attendance(self, id: Uuid) -> Result<StaffAttendance, DbError> {
        let staff_id = Uuid::parse_str(&self.staff_id)
            .map_err(|e| DbError::Migration(format!("invalid staff UUID: {e}")))?;
        Ok(StaffAttendance {
            id,
            staff_id,
            day: parse_day(&self.day)?,
            status: parse_attendance_status(&self.status)?,
            note: self.note,
            created_at: self.created_at,
        })
    }
}

impl AttendanceRowWithId {
    fn try_into_attendance(self) -> Result<StaffAttendance, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let staff_id = Uuid::parse_str(&self.staff_id)
            .map_err(|e| DbError::Migration(format!("invalid staff UUID: {e}")))?;
        Ok(StaffAttendance {
            id,
            staff_id,
            day: parse_day(&self.day)?,
            status: parse_attendance_status(&self.status)?,
            note: self.note,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the StaffAttendance repository.
#[derive(Clone)]
pub struct SurrealStaffAttendanceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealStaffAttendanceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Tenant-chain check: the staff member must exist under `vendor_id`.
    async fn assert_staff_in_scope(&self, vendor_id: Uuid, staff_id: Uuid) -> Result<(), DbError> {
        let staff_id_str = staff_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM type::record('staff', $staff_id) \
                 WHERE vendor_id = $vendor_id GROUP ALL",
            )
            .bind(("staff_id", staff_id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await?;

        let rows: Vec<CountRow> = result.take(0)?;
        if rows.first().map(|r| r.total).unwrap_or(0) == 0 {
            return Err(DbError::NotFound {
                entity: "staff".into(),
                id: staff_id_str,
            });
        }

        Ok(())
    }
}

impl<C: Connection> StaffAttendanceRepository for SurrealStaffAttendanceRepository<C> {
    async fn record(
        &self,
        vendor_id: Uuid,
        input: CreateStaffAttendance,
    ) -> VendoResult<StaffAttendance> {
        self.assert_staff_in_scope(vendor_id, input.staff_id)
            .await?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('staff_attendance', $id) SET \
                 staff_id = $staff_id, \
                 day = $day, status = $status, note = $note",
            )
            .bind(("id", id_str.clone()))
            .bind(("staff_id", input.staff_id.to_string()))
            .bind(("day", input.day.to_string()))
            .bind(("status", attendance_status_to_string(input.status).to_string()))
            .bind(("note", input.note))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Conflict(format!("attendance entry rejected: {e}")))?;

        let rows: Vec<AttendanceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "staff_attendance".into(),
            id: id_str,
        })?;

        Ok(row.into_attendance(id)?)
    }

    async fn list_for_staff(
        &self,
        vendor_id: Uuid,
        staff_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> VendoResult<Vec<StaffAttendance>> {
        self.assert_staff_in_scope(vendor_id, staff_id).await?;

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM staff_attendance \
                 WHERE staff_id = $staff_id \
                 AND day >= $from AND day <= $to \
                 ORDER BY day ASC",
            )
            .bind(("staff_id", staff_id.to_string()))
            .bind(("from", from.to_string()))
            .bind(("to", to.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AttendanceRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_attendance())
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
