//! SurrealDB implementation of [`DiningTableRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vendo_core::error::VendoResult;
use vendo_core::models::dining_table::{CreateDiningTable, DiningTable, UpdateDiningTable};
use vendo_core::repository::{DiningTableRepository, PaginatedResult, Pagination};

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TableRow {
    vendor_id: String,
    name: String,
    capacity: u32,
    is_occupied: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TableRowWithId {
    record_id: String,
    vendor_id: String,
    name: String,
    capacity: u32,
    is_occupied: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TableRow {
    fn into_table(self, id: Uuid) -> Result<DiningTable, DbError> {
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        Ok(DiningTable {
            id,
            vendor_id,
            name: self.name,
            capacity: self.capacity,
            is_occupied: self.is_occupied,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TableRowWithId {
    fn try_into_table(self) -> Result<DiningTable, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        Ok(DiningTable {
            id,
            vendor_id,
            name: self.name,
            capacity: self.capacity,
            is_occupied: self.is_occupied,
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

/// SurrealDB implementation of the DiningTable repository.
#[derive(Clone)]
pub struct SurrealDiningTableRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealDiningTableRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> DiningTableRepository for SurrealDiningTableRepository<C> {
    async fn create(&self, input: CreateDiningTable) -> VendoResult<DiningTable> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('dining_table', $id) SET \
                 vendor_id = $vendor_id, \
                 name = $name, capacity = $capacity, \
                 is_occupied = false",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", input.vendor_id.to_string()))
            .bind(("name", input.name))
            .bind(("capacity", input.capacity))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TableRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "dining_table".into(),
            id: id_str,
        })?;

        Ok(row.into_table(id)?)
    }

    async fn get(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<DiningTable> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('dining_table', $id) \
                 WHERE vendor_id = $vendor_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TableRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "dining_table".into(),
            id: id_str,
        })?;

        Ok(row.into_table(id)?)
    }

    async fn update(
        &self,
        vendor_id: Uuid,
        id: Uuid,
        input: UpdateDiningTable,
    ) -> VendoResult<DiningTable> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.capacity.is_some() {
            sets.push("capacity = $capacity");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('dining_table', $id) SET {} \
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
        if let Some(capacity) = input.capacity {
            builder = builder.bind(("capacity", capacity));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TableRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "dining_table".into(),
            id: id_str,
        })?;

        Ok(row.into_table(id)?)
    }

    async fn set_occupied(
        &self,
        vendor_id: Uuid,
        id: Uuid,
        occupied: bool,
    ) -> VendoResult<DiningTable> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('dining_table', $id) SET \
                 is_occupied = $is_occupied, updated_at = time::now() \
                 WHERE vendor_id = $vendor_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .bind(("is_occupied", occupied))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TableRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "dining_table".into(),
            id: id_str,
        })?;

        Ok(row.into_table(id)?)
    }

    async fn delete(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "DELETE type::record('dining_table', $id) \
                 WHERE vendor_id = $vendor_id RETURN BEFORE",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TableRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "dining_table".into(),
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
    ) -> VendoResult<PaginatedResult<DiningTable>> {
        let vendor_id_str = vendor_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM dining_table \
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
                "SELECT meta::id(id) AS record_id, * FROM dining_table \
                 WHERE vendor_id = $vendor_id \
                 ORDER BY name ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("vendor_id", vendor_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TableRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_table())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
