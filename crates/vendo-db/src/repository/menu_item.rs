//! SurrealDB implementation of [`MenuItemRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vendo_core::error::VendoResult;
use vendo_core::models::menu_item::{CreateMenuItem, MenuItem, UpdateMenuItem};
use vendo_core::repository::{MenuItemRepository, PaginatedResult, Pagination};

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct MenuItemRow {
    vendor_id: String,
    name: String,
    description: Option<String>,
    category: String,
    price: f64,
    is_available: bool,
    inventory_item_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct MenuItemRowWithId {
    record_id: String,
    vendor_id: String,
    name: String,
    description: Option<String>,
    category: String,
    price: f64,
    is_available: bool,
    inventory_item_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_inventory_link(raw: Option<String>) -> Result<Option<Uuid>, DbError> {
    raw.map(|s| {
        Uuid::parse_str(&s).map_err(|e| DbError::Migration(format!("invalid inventory UUID: {e}")))
    })
    .transpose()
}

impl MenuItemRow {
    fn into_menu_item(self, id: Uuid) -> Result<MenuItem, DbError> {
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        Ok(MenuItem {
            id,
            vendor_id,
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            is_available: self.is_available,
            inventory_item_id: parse_inventory_link(self.inventory_item_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl MenuItemRowWithId {
    fn try_into_menu_item(self) -> Result<MenuItem, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        Ok(MenuItem {
            id,
            vendor_id,
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            is_available: self.is_available,
            inventory_item_id: parse_inventory_link(self.inventory_item_id)?,
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

/// SurrealDB implementation of the MenuItem repository.
#[derive(Clone)]
pub struct SurrealMenuItemRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMenuItemRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> MenuItemRepository for SurrealMenuItemRepository<C> {
    async fn create(&self, input: CreateMenuItem) -> VendoResult<MenuItem> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('menu_item', $id) SET \
                 vendor_id = $vendor_id, \
                 name = $name, description = $description, \
                 category = $category, price = $price, \
                 is_available = true, \
                 inventory_item_id = $inventory_item_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", input.vendor_id.to_string()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("category", input.category))
            .bind(("price", input.price))
            .bind((
                "inventory_item_id",
                input.inventory_item_id.map(|v| v.to_string()),
            ))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<MenuItemRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "menu_item".into(),
            id: id_str,
        })?;

        Ok(row.into_menu_item(id)?)
    }

    async fn get(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<MenuItem> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('menu_item', $id) \
                 WHERE vendor_id = $vendor_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MenuItemRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "menu_item".into(),
            id: id_str,
        })?;

        Ok(row.into_menu_item(id)?)
    }

    async fn update(
        &self,
        vendor_id: Uuid,
        id: Uuid,
        input: UpdateMenuItem,
    ) -> VendoResult<MenuItem> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.category.is_some() {
            sets.push("category = $category");
        }
        if input.price.is_some() {
            sets.push("price = $price");
        }
        if input.is_available.is_some() {
            sets.push("is_available = $is_available");
        }
        if input.inventory_item_id.is_some() {
            sets.push("inventory_item_id = $inventory_item_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('menu_item', $id) SET {} \
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
        if let Some(description) = input.description {
            // description is Option<Option<String>>: Some(None) = clear
            builder = builder.bind(("description", description));
        }
        if let Some(category) = input.category {
            builder = builder.bind(("category", category));
        }
        if let Some(price) = input.price {
            builder = builder.bind(("price", price));
        }
        if let Some(is_available) = input.is_available {
            builder = builder.bind(("is_available", is_available));
        }
        if let Some(inventory_item_id) = input.inventory_item_id {
            builder = builder.bind((
                "inventory_item_id",
                inventory_item_id.map(|v| v.to_string()),
            ));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<MenuItemRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "menu_item".into(),
            id: id_str,
        })?;

        Ok(row.into_menu_item(id)?)
    }

    async fn delete(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "DELETE type::record('menu_item', $id) \
                 WHERE vendor_id = $vendor_id RETURN BEFORE",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MenuItemRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "menu_item".into(),
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
    ) -> VendoResult<PaginatedResult<MenuItem>> {
        let vendor_id_str = vendor_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM menu_item \
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
                "SELECT meta::id(id) AS record_id, * FROM menu_item \
                 WHERE vendor_id = $vendor_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("vendor_id", vendor_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MenuItemRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_menu_item())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
