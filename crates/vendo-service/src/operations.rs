//! Day-to-day operations services: tables, staff and attendance,
//! expenses, and notifications. All follow the same shape — gate,
//! validate, stamp the vendor id, delegate.

use uuid::Uuid;
use vendo_core::context::TenantContext;
use vendo_core::error::VendoResult;
use vendo_core::models::dining_table::{CreateDiningTable, DiningTable, UpdateDiningTable};
use vendo_core::models::expense::{CreateExpense, Expense};
use vendo_core::models::notification::Notification;
use vendo_core::models::staff::{CreateStaff, CreateStaffAttendance, Staff, StaffAttendance, UpdateStaff};
use vendo_core::repository::{
    DiningTableRepository, ExpenseRepository, NotificationRepository, PaginatedResult, Pagination,
    StaffAttendanceRepository, StaffRepository,
};

use crate::contract::{
    self, AttendanceEntry, ExpenseDraft, StaffDraft, StaffPatch, TableDraft, TablePatch,
};

pub struct TableService<T: DiningTableRepository> {
    tables: T,
}

impl<T: DiningTableRepository> TableService<T> {
    pub fn new(tables: T) -> Self {
        Self { tables }
    }

    pub async fn create(&self, ctx: &TenantContext, draft: TableDraft) -> VendoResult<DiningTable> {
        ctx.require_active()?;
        contract::check(&draft)?;

        self.tables
            .create(CreateDiningTable {
                vendor_id: ctx.vendor_id,
                name: draft.name,
                capacity: draft.capacity,
            })
            .await
    }

    pub async fn update(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        patch: TablePatch,
    ) -> VendoResult<DiningTable> {
        ctx.require_active()?;
        contract::check(&patch)?;

        self.tables
            .update(
                ctx.vendor_id,
                id,
                UpdateDiningTable {
                    name: patch.name,
                    capacity: patch.capacity,
                },
            )
            .await
    }

    pub async fn set_occupied(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        occupied: bool,
    ) -> VendoResult<DiningTable> {
        ctx.require_active()?;
        self.tables.set_occupied(ctx.vendor_id, id, occupied).await
    }

    pub async fn delete(&self, ctx: &TenantContext, id: Uuid) -> VendoResult<()> {
        ctx.require_active()?;
        self.tables.delete(ctx.vendor_id, id).await
    }

    pub async fn list(
        &self,
        ctx: &TenantContext,
        pagination: Pagination,
    ) -> VendoResult<PaginatedResult<DiningTable>> {
        ctx.require_active()?;
        self.tables.list(ctx.vendor_id, pagination).await
    }
}

pub struct StaffService<S, A>
where
    S: StaffRepository,
    A: StaffAttendanceRepository,
{
    staff: S,
    attendance: A,
}

impl<S, A> StaffService<S, A>
where
    S: StaffRepository,
    A: StaffAttendanceRepository,
{
    pub fn new(staff: S, attendance: A) -> Self {
        Self { staff, attendance }
    }

    pub async fn create(&self, ctx: &TenantContext, draft: StaffDraft) -> VendoResult<Staff> {
        ctx.require_active()?;
        contract::check(&draft)?;

        self.staff
            .create(CreateStaff {
                vendor_id: ctx.vendor_id,
                name: draft.name,
                role: draft.role,
                phone: draft.phone,
            })
            .await
    }

    pub async fn update(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        patch: StaffPatch,
    ) -> VendoResult<Staff> {
        ctx.require_active()?;
        contract::check(&patch)?;

        self.staff
            .update(
                ctx.vendor_id,
                id,
                UpdateStaff {
                    name: patch.name,
                    role: patch.role,
                    phone: patch.phone,
                    is_active: patch.is_active,
                },
            )
            .await
    }

    pub async fn delete(&self, ctx: &TenantContext, id: Uuid) -> VendoResult<()> {
        ctx.require_active()?;
        self.staff.delete(ctx.vendor_id, id).await
    }

    pub async fn list(
        &self,
        ctx: &TenantContext,
        pagination: Pagination,
    ) -> VendoResult<PaginatedResult<Staff>> {
        ctx.require_active()?;
        self.staff.list(ctx.vendor_id, pagination).await
    }

    /// Record one attendance entry; the repository validates the staff
    /// chain and the one-entry-per-day rule.
    pub async fn record_attendance(
        &self,
        ctx: &TenantContext,
        entry: AttendanceEntry,
    ) -> VendoResult<StaffAttendance> {
        ctx.require_active()?;
        contract::check(&entry)?;

        self.attendance
            .record(
                ctx.vendor_id,
                CreateStaffAttendance {
                    staff_id: entry.staff_id,
                    day: entry.day,
                    status: entry.status,
                    note: entry.note,
                },
            )
            .await
    }

    pub async fn attendance_for(
        &self,
        ctx: &TenantContext,
        staff_id: Uuid,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    ) -> VendoResult<Vec<StaffAttendance>> {
        ctx.require_active()?;
        self.attendance
            .list_for_staff(ctx.vendor_id, staff_id, from, to)
            .await
    }
}

pub struct ExpenseService<E: ExpenseRepository> {
    expenses: E,
}

impl<E: ExpenseRepository> ExpenseService<E> {
    pub fn new(expenses: E) -> Self {
        Self { expenses }
    }

    pub async fn create(&self, ctx: &TenantContext, draft: ExpenseDraft) -> VendoResult<Expense> {
        ctx.require_active()?;
        contract::check(&draft)?;

        self.expenses
            .create(CreateExpense {
                vendor_id: ctx.vendor_id,
                category: draft.category,
                amount: draft.amount,
                note: draft.note,
                incurred_on: draft.incurred_on,
            })
            .await
    }

    pub async fn delete(&self, ctx: &TenantContext, id: Uuid) -> VendoResult<()> {
        ctx.require_active()?;
        self.expenses.delete(ctx.vendor_id, id).await
    }

    pub async fn list(
        &self,
        ctx: &TenantContext,
        pagination: Pagination,
    ) -> VendoResult<PaginatedResult<Expense>> {
        ctx.require_active()?;
        self.expenses.list(ctx.vendor_id, pagination).await
    }
}

pub struct NotificationService<N: NotificationRepository> {
    notifications: N,
}

impl<N: NotificationRepository> NotificationService<N> {
    pub fn new(notifications: N) -> Self {
        Self { notifications }
    }

    pub async fn list(
        &self,
        ctx: &TenantContext,
        pagination: Pagination,
    ) -> VendoResult<PaginatedResult<Notification>> {
        ctx.require_active()?;
        self.notifications.list(ctx.vendor_id, pagination).await
    }

    pub async fn mark_read(&self, ctx: &TenantContext, id: Uuid) -> VendoResult<Notification> {
        ctx.require_active()?;
        self.notifications.mark_read(ctx.vendor_id, id).await
    }

    pub async fn unread_count(&self, ctx: &TenantContext) -> VendoResult<u64> {
        ctx.require_active()?;
        self.notifications.unread_count(ctx.vendor_id).await
    }

    pub async fn delete(&self, ctx: &TenantContext, id: Uuid) -> VendoResult<()> {
        ctx.require_active()?;
        self.notifications.delete(ctx.vendor_id, id).await
    }
}
