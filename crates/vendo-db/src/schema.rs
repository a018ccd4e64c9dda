//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Closed enumerations are stored as
//! strings with ASSERT constraints. The `stock >= 0` assertion on
//! inventory items is what rolls back a bill transaction on underflow.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Vendor profiles (global scope; the tenant)
-- =======================================================================
DEFINE TABLE profile SCHEMAFULL;
DEFINE FIELD subject ON TABLE profile TYPE string;
DEFINE FIELD business_name ON TABLE profile TYPE string;
DEFINE FIELD owner_name ON TABLE profile TYPE string;
DEFINE FIELD phone ON TABLE profile TYPE string;
DEFINE FIELD email ON TABLE profile TYPE string;
DEFINE FIELD address ON TABLE profile TYPE option<string>;
DEFINE FIELD onboarding_status ON TABLE profile TYPE string \
    ASSERT $value IN ['Pending', 'Active', 'Rejected'];
DEFINE FIELD is_admin ON TABLE profile TYPE bool DEFAULT false;
DEFINE FIELD features ON TABLE profile TYPE array DEFAULT [];
DEFINE FIELD features.* ON TABLE profile TYPE string;
DEFINE FIELD created_at ON TABLE profile TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE profile TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_profile_subject ON TABLE profile \
    COLUMNS subject UNIQUE;

-- =======================================================================
-- Customers (vendor scope)
-- =======================================================================
DEFINE TABLE customer SCHEMAFULL;
DEFINE FIELD vendor_id ON TABLE customer TYPE string;
DEFINE FIELD name ON TABLE customer TYPE string;
DEFINE FIELD phone ON TABLE customer TYPE string;
DEFINE FIELD email ON TABLE customer TYPE option<string>;
DEFINE FIELD notes ON TABLE customer TYPE option<string>;
DEFINE FIELD visit_count ON TABLE customer TYPE int DEFAULT 0 \
    ASSERT $value >= 0;
DEFINE FIELD total_spent ON TABLE customer TYPE float DEFAULT 0.0;
DEFINE FIELD last_visit_at ON TABLE customer TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE customer TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE customer TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_customer_vendor_phone ON TABLE customer \
    COLUMNS vendor_id, phone UNIQUE;
DEFINE INDEX idx_customer_vendor_created ON TABLE customer \
    COLUMNS vendor_id, created_at;

-- =======================================================================
-- Menu items (vendor scope)
-- =======================================================================
DEFINE TABLE menu_item SCHEMAFULL;
DEFINE FIELD vendor_id ON TABLE menu_item TYPE string;
DEFINE FIELD name ON TABLE menu_item TYPE string;
DEFINE FIELD description ON TABLE menu_item TYPE option<string>;
DEFINE FIELD category ON TABLE menu_item TYPE string;
DEFINE FIELD price ON TABLE menu_item TYPE float ASSERT $value >= 0;
DEFINE FIELD is_available ON TABLE menu_item TYPE bool DEFAULT true;
DEFINE FIELD inventory_item_id ON TABLE menu_item TYPE option<string>;
DEFINE FIELD created_at ON TABLE menu_item TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE menu_item TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_menu_item_vendor_name ON TABLE menu_item \
    COLUMNS vendor_id, name UNIQUE;

-- =======================================================================
-- Inventory items (vendor scope)
-- =======================================================================
DEFINE TABLE inventory_item SCHEMAFULL;
DEFINE FIELD vendor_id ON TABLE inventory_item TYPE string;
DEFINE FIELD name ON TABLE inventory_item TYPE string;
DEFINE FIELD unit ON TABLE inventory_item TYPE string;
DEFINE FIELD stock ON TABLE inventory_item TYPE float \
    ASSERT $value >= 0;
DEFINE FIELD low_stock_threshold ON TABLE inventory_item TYPE float \
    DEFAULT 0.0;
DEFINE FIELD created_at ON TABLE inventory_item TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE inventory_item TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_inventory_vendor_name ON TABLE inventory_item \
    COLUMNS vendor_id, name UNIQUE;

-- =======================================================================
-- Bills (vendor scope; line items embedded, denormalized at write time)
-- =======================================================================
DEFINE TABLE bill SCHEMAFULL;
DEFINE FIELD vendor_id ON TABLE bill TYPE string;
DEFINE FIELD customer_id ON TABLE bill TYPE option<string>;
DEFINE FIELD items ON TABLE bill TYPE array;
DEFINE FIELD items.* ON TABLE bill TYPE object;
DEFINE FIELD items.*.item_id ON TABLE bill TYPE string;
DEFINE FIELD items.*.name ON TABLE bill TYPE string;
DEFINE FIELD items.*.quantity ON TABLE bill TYPE int ASSERT $value >= 1;
DEFINE FIELD items.*.price ON TABLE bill TYPE float;
DEFINE FIELD items.*.total ON TABLE bill TYPE float;
DEFINE FIELD total_amount ON TABLE bill TYPE float ASSERT $value >= 0;
DEFINE FIELD discount ON TABLE bill TYPE float DEFAULT 0.0 \
    ASSERT $value >= 0;
DEFINE FIELD extra_charges ON TABLE bill TYPE float DEFAULT 0.0 \
    ASSERT $value >= 0;
DEFINE FIELD final_amount ON TABLE bill TYPE float;
DEFINE FIELD payment_method ON TABLE bill TYPE string \
    ASSERT $value IN ['Cash', 'Card', 'Upi', 'Other'];
DEFINE FIELD created_at ON TABLE bill TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_bill_vendor_created ON TABLE bill \
    COLUMNS vendor_id, created_at;

-- =======================================================================
-- Loyalty rewards (vendor scope)
-- =======================================================================
DEFINE TABLE loyalty_reward SCHEMAFULL;
DEFINE FIELD vendor_id ON TABLE loyalty_reward TYPE string;
DEFINE FIELD name ON TABLE loyalty_reward TYPE string;
DEFINE FIELD description ON TABLE loyalty_reward TYPE option<string>;
DEFINE FIELD points_required ON TABLE loyalty_reward TYPE int \
    ASSERT $value >= 0;
DEFINE FIELD is_active ON TABLE loyalty_reward TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE loyalty_reward TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE loyalty_reward TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_loyalty_reward_vendor_name ON TABLE loyalty_reward \
    COLUMNS vendor_id, name UNIQUE;

-- =======================================================================
-- Loyalty points (child scope via customer)
-- =======================================================================
DEFINE TABLE loyalty_point SCHEMAFULL;
DEFINE FIELD customer_id ON TABLE loyalty_point TYPE string;
DEFINE FIELD points ON TABLE loyalty_point TYPE int;
DEFINE FIELD reason ON TABLE loyalty_point TYPE string;
DEFINE FIELD created_at ON TABLE loyalty_point TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_loyalty_point_customer ON TABLE loyalty_point \
    COLUMNS customer_id;

-- =======================================================================
-- Notifications (vendor scope)
-- =======================================================================
DEFINE TABLE notification SCHEMAFULL;
DEFINE FIELD vendor_id ON TABLE notification TYPE string;
DEFINE FIELD title ON TABLE notification TYPE string;
DEFINE FIELD body ON TABLE notification TYPE string;
DEFINE FIELD read ON TABLE notification TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE notification TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_notification_vendor_created ON TABLE notification \
    COLUMNS vendor_id, created_at;

-- =======================================================================
-- Dining tables (vendor scope)
-- =======================================================================
DEFINE TABLE dining_table SCHEMAFULL;
DEFINE FIELD vendor_id ON TABLE dining_table TYPE string;
DEFINE FIELD name ON TABLE dining_table TYPE string;
DEFINE FIELD capacity ON TABLE dining_table TYPE int ASSERT $value >= 1;
DEFINE FIELD is_occupied ON TABLE dining_table TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE dining_table TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE dining_table TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_dining_table_vendor_name ON TABLE dining_table \
    COLUMNS vendor_id, name UNIQUE;

-- =======================================================================
-- Staff (vendor scope)
-- =======================================================================
DEFINE TABLE staff SCHEMAFULL;
DEFINE FIELD vendor_id ON TABLE staff TYPE string;
DEFINE FIELD name ON TABLE staff TYPE string;
DEFINE FIELD role ON TABLE staff TYPE string;
DEFINE FIELD phone ON TABLE staff TYPE string;
DEFINE FIELD is_active ON TABLE staff TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE staff TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE staff TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_staff_vendor ON TABLE staff COLUMNS vendor_id;

-- =======================================================================
-- Staff attendance (child scope via staff; one entry per day)
-- =======================================================================
DEFINE TABLE staff_attendance SCHEMAFULL;
DEFINE FIELD staff_id ON TABLE staff_attendance TYPE string;
DEFINE FIELD day ON TABLE staff_attendance TYPE string;
DEFINE FIELD status ON TABLE staff_attendance TYPE string \
    ASSERT $value IN ['Present', 'Absent', 'HalfDay', 'Leave'];
DEFINE FIELD note ON TABLE staff_attendance TYPE option<string>;
DEFINE FIELD created_at ON TABLE staff_attendance TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_attendance_staff_day ON TABLE staff_attendance \
    COLUMNS staff_id, day UNIQUE;

-- =======================================================================
-- Expenses (vendor scope)
-- =======================================================================
DEFINE TABLE expense SCHEMAFULL;
DEFINE FIELD vendor_id ON TABLE expense TYPE string;
DEFINE FIELD category ON TABLE expense TYPE string;
DEFINE FIELD amount ON TABLE expense TYPE float ASSERT $value >= 0;
DEFINE FIELD note ON TABLE expense TYPE option<string>;
DEFINE FIELD incurred_on ON TABLE expense TYPE string;
DEFINE FIELD created_at ON TABLE expense TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_expense_vendor_incurred ON TABLE expense \
    COLUMNS vendor_id, incurred_on;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
