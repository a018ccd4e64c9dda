//! SurrealDB implementation of [`ExpenseRepository`].

use chrono::{DateTime, NaiveDate, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vendo_core::error::VendoResult;
use vendo_core::models::expense::{CreateExpense, Expense};
use vendo_core::repository::{ExpenseRepository, PaginatedResult, Pagination};

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ExpenseRow {
    vendor_id: String,
    category: String,
    amount: f64,
    note: Option<String>,
    incurred_on: String,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ExpenseRowWithId {
    record_id: String,
    vendor_id: String,
    category: String,
    amount: f64,
    note: Option<String>,
    incurred_on: String,
    created_at: DateTime<Utc>,
}

fn parse_date(s: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DbError::Migration(format!("invalid expense date: {e}")))
}

impl ExpenseRow {
    fn into_expense(self, id: Uuid) -> Result<Expense, DbError> {
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        Ok(Expense {
            id,
            vendor_id,
            category: self.category,
            amount: self.amount,
            note: self.note,
            incurred_on: parse_date(&self.incurred_on)?,
            created_at: self.created_at,
        })
    }
}

impl ExpenseRowWithId {
    fn try_into_expense(self) -> Result<Expense, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        Ok(Expense {
            id,
            vendor_id,
            category: self.category,
            amount: self.amount,
            note: self.note,
            incurred_on: parse_date(&self.incurred_on)?,
            created_at: self.created_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Expense repository.
#[derive(Clone)]
pub struct SurrealExpenseRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealExpenseRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ExpenseRepository for SurrealExpenseRepository<C> {
    async fn create(&self, input: CreateExpense) -> VendoResult<Expense> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('expense', $id) SET \
                 vendor_id = $vendor_id, \
                 category = $category, amount = $amount, \
                 note = $note, incurred_on = $incurred_on",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", input.vendor_id.to_string()))
            .bind(("category", input.category))
            .bind(("amount", input.amount))
            .bind(("note", input.note))
            .bind(("incurred_on", input.incurred_on.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ExpenseRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "expense".into(),
            id: id_str,
        })?;

        Ok(row.into_expense(id)?)
    }

    async fn get(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<Expense> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('expense', $id) \
                 WHERE vendor_id = $vendor_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ExpenseRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "expense".into(),
            id: id_str,
        })?;

        Ok(row.into_expense(id)?)
    }

    async fn delete(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "DELETE type::record('expense', $id) \
                 WHERE vendor_id = $vendor_id RETURN BEFORE",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ExpenseRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "expense".into(),
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
    ) -> VendoResult<PaginatedResult<Expense>> {
        let vendor_id_str = vendor_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM expense \
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
                "SELECT meta::id(id) AS record_id, * FROM expense \
                 WHERE vendor_id = $vendor_id \
                 ORDER BY incurred_on DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("vendor_id", vendor_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ExpenseRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_expense())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_between(
        &self,
        vendor_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> VendoResult<Vec<Expense>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM expense \
                 WHERE vendor_id = $vendor_id \
                 AND incurred_on >= $from AND incurred_on <= $to \
                 ORDER BY incurred_on ASC",
            )
            .bind(("vendor_id", vendor_id.to_string()))
            .bind(("from", from.to_string()))
            .bind(("to", to.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ExpenseRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_expense())
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
