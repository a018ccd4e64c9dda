//! SurrealDB repository implementations.

mod bill;
mod customer;
mod dining_table;
mod expense;
mod inventory;
mod loyalty;
mod menu_item;
mod notification;
mod profile;
mod staff;

pub use bill::SurrealBillRepository;
pub use customer::SurrealCustomerRepository;
pub use dining_table::SurrealDiningTableRepository;
pub use expense::SurrealExpenseRepository;
pub use inventory::SurrealInventoryRepository;
pub use loyalty::{SurrealLoyaltyPointRepository, SurrealLoyaltyRewardRepository};
pub use menu_item::SurrealMenuItemRepository;
pub use notification::SurrealNotificationRepository;
pub use profile::SurrealProfileRepository;
pub use staff::{SurrealStaffAttendanceRepository, SurrealStaffRepository};
