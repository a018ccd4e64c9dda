//! SurrealDB implementation of [`InventoryRepository`].
//!
//! The schema asserts `stock >= 0`, so any write that would take stock
//! below zero fails and leaves the row unchanged.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vendo_core::error::VendoResult;
use vendo_core::models::inventory_item::{CreateInventoryItem, InventoryItem, UpdateInventoryItem};
use vendo_core::repository::{InventoryRepository, PaginatedResult, Pagination};

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct InventoryRow {
    vendor_id: String,
    name: String,
    unit: String,
    stock: f64,
    low_stock_threshold: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct InventoryRowWithId {
    record_id: String,
    vendor_id: String,
    name: String,
    unit: String,
    stock: f64,
    low_stock_threshold: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InventoryRow {
    fn into_item(self, id: Uuid) -> Result<InventoryItem, DbError> {
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        Ok(InventoryItem {
            id,
            vendor_id,
            name: self.name,
            unit: self.unit,
            stock: self.stock,
            low_stock_threshold: self.low_stock_threshold,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl InventoryRowWithId {
    fn try_into_item(self) -> Result<InventoryItem, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        Ok(InventoryItem {
            id,
            vendor_id,
            name: self.name,
            unit: self.unit,
            stock: self.stock,
            low_stock_threshold: self.low_stock_threshold,
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

/// SurrealDB implementation of the Inventory repository.
#[derive(Clone)]
pub struct SurrealInventoryRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealInventoryRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> InventoryRepository for SurrealInventoryRepository<C> {
    async fn create(&self, input: CreateInventoryItem) -> VendoResult<InventoryItem> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('inventory_item', $id) SET \
                 vendor_id = $vendor_id, \
                 name = $name, unit = $unit, \
                 stock = $stock, \
                 low_stock_threshold = $low_stock_threshold",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", input.vendor_id.to_string()))
            .bind(("name", input.name))
            .bind(("unit", input.unit))
            .bind(("stock", input.stock))
            .bind(("low_stock_threshold", input.low_stock_threshold))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<InventoryRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "inventory_item".into(),
            id: id_str,
        })?;

        Ok(row.into_item(id)?)
    }

    async fn get(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<InventoryItem> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('inventory_item', $id) \
                 WHERE vendor_id = $vendor_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InventoryRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "inventory_item".into(),
            id: id_str,
        })?;

        Ok(row.into_item(id)?)
    }

    async fn update(
        &self,
        vendor_id: Uuid,
        id: Uuid,
        input: UpdateInventoryItem,
    ) -> VendoResult<InventoryItem> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.unit.is_some() {
            sets.push("unit = $unit");
        }
        if input.low_stock_threshold.is_some() {
            sets.push("low_stock_threshold = $low_stock_threshold");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('inventory_item', $id) SET {} \
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
        if let Some(unit) = input.unit {
            builder = builder.bind(("unit", unit));
        }
        if let Some(threshold) = input.low_stock_threshold {
            builder = builder.bind(("low_stock_threshold", threshold));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<InventoryRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "inventory_item".into(),
            id: id_str,
        })?;

        Ok(row.into_item(id)?)
    }

    async fn delete(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "DELETE type::record('inventory_item', $id) \
                 WHERE vendor_id = $vendor_id RETURN BEFORE",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InventoryRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "inventory_item".into(),
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
    ) -> VendoResult<PaginatedResult<InventoryItem>> {
        let vendor_id_str = vendor_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM inventory_item \
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
                "SELECT meta::id(id) AS record_id, * FROM inventory_item \
                 WHERE vendor_id = $vendor_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("vendor_id", vendor_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InventoryRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_item())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn adjust_stock(&self, vendor_id: Uuid, id: Uuid, delta: f64) -> VendoResult<InventoryItem> {
        // Load within scope first so an underflow reports as a conflict,
        // not a bare database error. The schema assertion still guards
        // against concurrent decrements.
        let current = self.get(vendor_id, id).await?;
        if current.stock + delta < 0.0 {
            return Err(DbError::Conflict(format!(
                "insufficient stock for {}: have {}, requested change {}",
                current.name, current.stock, delta
            ))
            .into());
        }

        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('inventory_item', $id) SET \
                 stock += $delta, updated_at = time::now() \
                 WHERE vendor_id = $vendor_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .bind(("delta", delta))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<InventoryRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "inventory_item".into(),
            id: id_str,
        })?;

        Ok(row.into_item(id)?)
    }

    async fn list_low_stock(&self, vendor_id: Uuid) -> VendoResult<Vec<InventoryItem>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM inventory_item \
                 WHERE vendor_id = $vendor_id \
                 AND stock <= low_stock_threshold \
                 ORDER BY name ASC",
            )
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InventoryRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_item())
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
