//! SurrealDB implementation of [`CustomerRepository`].
//!
//! Every statement other than create carries a
//! `WHERE vendor_id = $vendor_id` filter; a row outside the caller's
//! scope surfaces as NotFound.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vendo_core::error::VendoResult;
use vendo_core::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use vendo_core::repository::{CustomerRepository, PaginatedResult, Pagination};

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct CustomerRow {
    vendor_id: String,
    name: String,
    phone: String,
    email: Option<String>,
    notes: Option<String>,
    visit_count: u32,
    total_spent: f64,
    last_visit_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct CustomerRowWithId {
    record_id: String,
    vendor_id: String,
    name: String,
    phone: String,
    email: Option<String>,
    notes: Option<String>,
    visit_count: u32,
    total_spent: f64,
    last_visit_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CustomerRow {
    fn into_customer(self, id: Uuid) -> Result<Customer, DbError> {
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        Ok(Customer {
            id,
            vendor_id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            notes: self.notes,
            visit_count: self.visit_count,
            total_spent: self.total_spent,
            last_visit_at: self.last_visit_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl CustomerRowWithId {
    fn try_into_customer(self) -> Result<Customer, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        Ok(Customer {
            id,
            vendor_id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            notes: self.notes,
            visit_count: self.visit_count,
            total_spent: self.total_spent,
            last_visit_at: self.last_visit_at,
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

/// SurrealDB implementation of the Customer repository.
#[derive(Clone)]
pub struct SurrealCustomerRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCustomerRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CustomerRepository for SurrealCustomerRepository<C> {
    async fn create(&self, input: CreateCustomer) -> VendoResult<Customer> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('customer', $id) SET \
                 vendor_id = $vendor_id, \
                 name = $name, phone = $phone, \
                 email = $email, notes = $notes, \
                 visit_count = 0, total_spent = 0.0, \
                 last_visit_at = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", input.vendor_id.to_string()))
            .bind(("name", input.name))
            .bind(("phone", input.phone))
            .bind(("email", input.email))
            .bind(("notes", input.notes))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "customer".into(),
            id: id_str,
        })?;

        Ok(row.into_customer(id)?)
    }

    async fn get(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<Customer> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('customer', $id) \
                 WHERE vendor_id = $vendor_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "customer".into(),
            id: id_str,
        })?;

        Ok(row.into_customer(id)?)
    }

    async fn get_by_phone(&self, vendor_id: Uuid, phone: &str) -> VendoResult<Customer> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM customer \
                 WHERE vendor_id = $vendor_id AND phone = $phone",
            )
            .bind(("vendor_id", vendor_id.to_string()))
            .bind(("phone", phone.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CustomerRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "customer".into(),
            id: format!("phone={phone}"),
        })?;

        Ok(row.try_into_customer()?)
    }

    async fn update(
        &self,
        vendor_id: Uuid,
        id: Uuid,
        input: UpdateCustomer,
    ) -> VendoResult<Customer> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.notes.is_some() {
            sets.push("notes = $notes");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('customer', $id) SET {} \
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
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(email) = input.email {
            // email is Option<Option<String>>: Some(Some(v)) = set, Some(None) = clear
            builder = builder.bind(("email", email));
        }
        if let Some(notes) = input.notes {
            builder = builder.bind(("notes", notes));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "customer".into(),
            id: id_str,
        })?;

        Ok(row.into_customer(id)?)
    }

    async fn delete(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "DELETE type::record('customer', $id) \
                 WHERE vendor_id = $vendor_id RETURN BEFORE",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "customer".into(),
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
    ) -> VendoResult<PaginatedResult<Customer>> {
        let vendor_id_str = vendor_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM customer \
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
                "SELECT meta::id(id) AS record_id, * FROM customer \
                 WHERE vendor_id = $vendor_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("vendor_id", vendor_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CustomerRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_customer())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn record_visit(&self, vendor_id: Uuid, id: Uuid, amount: f64) -> VendoResult<Customer> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('customer', $id) SET \
                 visit_count += 1, \
                 total_spent += $amount, \
                 last_visit_at = time::now(), \
                 updated_at = time::now() \
                 WHERE vendor_id = $vendor_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .bind(("amount", amount))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "customer".into(),
            id: id_str,
        })?;

        Ok(row.into_customer(id)?)
    }

    async fn created_between(
        &self,
        vendor_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> VendoResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM customer \
                 WHERE vendor_id = $vendor_id \
                 AND created_at >= $from AND created_at < $to \
                 GROUP ALL",
            )
            .bind(("vendor_id", vendor_id.to_string()))
            .bind(("from", from))
            .bind(("to", to))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
