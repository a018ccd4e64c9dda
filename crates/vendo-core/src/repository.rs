//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Owned-entity repositories require
//! a `vendor_id` parameter on every read and mutation so that a
//! scope-less call is unrepresentable; create inputs carry the vendor id
//! stamped by the service layer. Child-entity repositories (loyalty
//! points, staff attendance) take the vendor id plus the parent key and
//! must validate the tenant chain.

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::VendoResult;
use crate::models::{
    bill::{Bill, CreateBill, StockDeduction},
    customer::{CreateCustomer, Customer, UpdateCustomer},
    dining_table::{CreateDiningTable, DiningTable, UpdateDiningTable},
    expense::{CreateExpense, Expense},
    inventory_item::{CreateInventoryItem, InventoryItem, UpdateInventoryItem},
    loyalty::{
        CreateLoyaltyPoint, CreateLoyaltyReward, LoyaltyPoint, LoyaltyReward, UpdateLoyaltyReward,
    },
    menu_item::{CreateMenuItem, MenuItem, UpdateMenuItem},
    notification::{CreateNotification, Notification},
    profile::{CreateProfile, OnboardingStatus, Profile, UpdateProfile},
    staff::{CreateStaff, CreateStaffAttendance, Staff, StaffAttendance, UpdateStaff},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Profiles (global scope)
// ---------------------------------------------------------------------------

pub trait ProfileRepository: Send + Sync {
    /// Create a profile in `Pending` status with `is_admin = false`.
    fn create(&self, input: CreateProfile) -> impl Future<Output = VendoResult<Profile>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = VendoResult<Profile>> + Send;
    fn get_by_subject(&self, subject: &str)
    -> impl Future<Output = VendoResult<Profile>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateProfile,
    ) -> impl Future<Output = VendoResult<Profile>> + Send;
    /// Blind status write. Transition legality is enforced by the
    /// onboarding service before this is called.
    fn set_status(
        &self,
        id: Uuid,
        status: OnboardingStatus,
    ) -> impl Future<Output = VendoResult<Profile>> + Send;
    fn set_admin(
        &self,
        id: Uuid,
        is_admin: bool,
    ) -> impl Future<Output = VendoResult<Profile>> + Send;
    /// Cross-tenant listing; the admin surface alone may reach this.
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = VendoResult<PaginatedResult<Profile>>> + Send;
}

// ---------------------------------------------------------------------------
// Owned entities (tenant scope)
// ---------------------------------------------------------------------------

pub trait CustomerRepository: Send + Sync {
    fn create(&self, input: CreateCustomer)
    -> impl Future<Output = VendoResult<Customer>> + Send;
    fn get(
        &self,
        vendor_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = VendoResult<Customer>> + Send;
    fn get_by_phone(
        &self,
        vendor_id: Uuid,
        phone: &str,
    ) -> impl Future<Output = VendoResult<Customer>> + Send;
    fn update(
        &self,
        vendor_id: Uuid,
        id: Uuid,
        input: UpdateCustomer,
    ) -> impl Future<Output = VendoResult<Customer>> + Send;
    fn delete(&self, vendor_id: Uuid, id: Uuid) -> impl Future<Output = VendoResult<()>> + Send;
    fn list(
        &self,
        vendor_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = VendoResult<PaginatedResult<Customer>>> + Send;
    /// Bump `visit_count`, add `amount` to `total_spent`, and stamp
    /// `last_visit_at`.
    fn record_visit(
        &self,
        vendor_id: Uuid,
        id: Uuid,
        amount: f64,
    ) -> impl Future<Output = VendoResult<Customer>> + Send;
    /// Number of customers created inside `[from, to)`, for analytics.
    fn created_between(
        &self,
        vendor_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> impl Future<Output = VendoResult<u64>> + Send;
}

pub trait MenuItemRepository: Send + Sync {
    fn create(&self, input: CreateMenuItem)
    -> impl Future<Output = VendoResult<MenuItem>> + Send;
    fn get(
        &self,
        vendor_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = VendoResult<MenuItem>> + Send;
    fn update(
        &self,
        vendor_id: Uuid,
        id: Uuid,
        input: UpdateMenuItem,
    ) -> impl Future<Output = VendoResult<MenuItem>> + Send;
    fn delete(&self, vendor_id: Uuid, id: Uuid) -> impl Future<Output = VendoResult<()>> + Send;
    fn list(
        &self,
        vendor_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = VendoResult<PaginatedResult<MenuItem>>> + Send;
}

pub trait InventoryRepository: Send + Sync {
    fn create(
        &self,
        input: CreateInventoryItem,
    ) -> impl Future<Output = VendoResult<InventoryItem>> + Send;
    fn get(
        &self,
        vendor_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = VendoResult<InventoryItem>> + Send;
    fn update(
        &self,
        vendor_id: Uuid,
        id: Uuid,
        input: UpdateInventoryItem,
    ) -> impl Future<Output = VendoResult<InventoryItem>> + Send;
    fn delete(&self, vendor_id: Uuid, id: Uuid) -> impl Future<Output = VendoResult<()>> + Send;
    fn list(
        &self,
        vendor_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = VendoResult<PaginatedResult<InventoryItem>>> + Send;
    /// Apply a signed stock delta. A result below zero fails and leaves
    /// the row unchanged.
    fn adjust_stock(
        &self,
        vendor_id: Uuid,
        id: Uuid,
        delta: f64,
    ) -> impl Future<Output = VendoResult<InventoryItem>> + Send;
    fn list_low_stock(
        &self,
        vendor_id: Uuid,
    ) -> impl Future<Output = VendoResult<Vec<InventoryItem>>> + Send;
}

pub trait BillRepository: Send + Sync {
    /// Create the bill and apply every stock deduction in one atomic
    /// transaction: underflow on any deduction leaves no bill behind.
    fn create(
        &self,
        input: CreateBill,
        deductions: Vec<StockDeduction>,
    ) -> impl Future<Output = VendoResult<Bill>> + Send;
    fn get(&self, vendor_id: Uuid, id: Uuid) -> impl Future<Output = VendoResult<Bill>> + Send;
    fn list(
        &self,
        vendor_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = VendoResult<PaginatedResult<Bill>>> + Send;
    /// Bills created inside `[from, to)`, oldest first, for analytics.
    fn list_between(
        &self,
        vendor_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> impl Future<Output = VendoResult<Vec<Bill>>> + Send;
}

pub trait LoyaltyRewardRepository: Send + Sync {
    fn create(
        &self,
        input: CreateLoyaltyReward,
    ) -> impl Future<Output = VendoResult<LoyaltyReward>> + Send;
    fn get(
        &self,
        vendor_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = VendoResult<LoyaltyReward>> + Send;
    fn update(
        &self,
        vendor_id: Uuid,
        id: Uuid,
        input: UpdateLoyaltyReward,
    ) -> impl Future<Output = VendoResult<LoyaltyReward>> + Send;
    fn delete(&self, vendor_id: Uuid, id: Uuid) -> impl Future<Output = VendoResult<()>> + Send;
    fn list(
        &self,
        vendor_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = VendoResult<PaginatedResult<LoyaltyReward>>> + Send;
}

/// Loyalty points inherit scope through the customer chain: every
/// operation validates that the customer belongs to `vendor_id` and
/// reports a chain miss as the customer not being found.
pub trait LoyaltyPointRepository: Send + Sync {
    fn append(
        &self,
        vendor_id: Uuid,
        input: CreateLoyaltyPoint,
    ) -> impl Future<Output = VendoResult<LoyaltyPoint>> + Send;
    fn list_for_customer(
        &self,
        vendor_id: Uuid,
        customer_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = VendoResult<PaginatedResult<LoyaltyPoint>>> + Send;
    fn balance(
        &self,
        vendor_id: Uuid,
        customer_id: Uuid,
    ) -> impl Future<Output = VendoResult<i64>> + Send;
}

pub trait NotificationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateNotification,
    ) -> impl Future<Output = VendoResult<Notification>> + Send;
    fn list(
        &self,
        vendor_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = VendoResult<PaginatedResult<Notification>>> + Send;
    fn mark_read(
        &self,
        vendor_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = VendoResult<Notification>> + Send;
    fn unread_count(&self, vendor_id: Uuid) -> impl Future<Output = VendoResult<u64>> + Send;
    fn delete(&self, vendor_id: Uuid, id: Uuid) -> impl Future<Output = VendoResult<()>> + Send;
}

pub trait DiningTableRepository: Send + Sync {
    fn create(
        &self,
        input: CreateDiningTable,
    ) -> impl Future<Output = VendoResult<DiningTable>> + Send;
    fn get(
        &self,
        vendor_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = VendoResult<DiningTable>> + Send;
    fn update(
        &self,
        vendor_id: Uuid,
        id: Uuid,
        input: UpdateDiningTable,
    ) -> impl Future<Output = VendoResult<DiningTable>> + Send;
    fn set_occupied(
        &self,
        vendor_id: Uuid,
        id: Uuid,
        occupied: bool,
    ) -> impl Future<Output = VendoResult<DiningTable>> + Send;
    fn delete(&self, vendor_id: Uuid, id: Uuid) -> impl Future<Output = VendoResult<()>> + Send;
    fn list(
        &self,
        vendor_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = VendoResult<PaginatedResult<DiningTable>>> + Send;
}

pub trait StaffRepository: Send + Sync {
    fn create(&self, input: CreateStaff) -> impl Future<Output = VendoResult<Staff>> + Send;
    fn get(&self, vendor_id: Uuid, id: Uuid) -> impl Future<Output = VendoResult<Staff>> + Send;
    fn update(
        &self,
        vendor_id: Uuid,
        id: Uuid,
        input: UpdateStaff,
    ) -> impl Future<Output = VendoResult<Staff>> + Send;
    fn delete(&self, vendor_id: Uuid, id: Uuid) -> impl Future<Output = VendoResult<()>> + Send;
    fn list(
        &self,
        vendor_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = VendoResult<PaginatedResult<Staff>>> + Send;
}

/// Attendance entries inherit scope through the staff chain.
pub trait StaffAttendanceRepository: Send + Sync {
    fn record(
        &self,
        vendor_id: Uuid,
        input: CreateStaffAttendance,
    ) -> impl Future<Output = VendoResult<StaffAttendance>> + Send;
    fn list_for_staff(
        &self,
        vendor_id: Uuid,
        staff_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Future<Output = VendoResult<Vec<StaffAttendance>>> + Send;
}

pub trait ExpenseRepository: Send + Sync {
    fn create(&self, input: CreateExpense) -> impl Future<Output = VendoResult<Expense>> + Send;
    fn get(&self, vendor_id: Uuid, id: Uuid)
    -> impl Future<Output = VendoResult<Expense>> + Send;
    fn delete(&self, vendor_id: Uuid, id: Uuid) -> impl Future<Output = VendoResult<()>> + Send;
    fn list(
        &self,
        vendor_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = VendoResult<PaginatedResult<Expense>>> + Send;
    /// Expenses incurred inside `[from, to]` by date, for analytics.
    fn list_between(
        &self,
        vendor_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Future<Output = VendoResult<Vec<Expense>>> + Send;
}
