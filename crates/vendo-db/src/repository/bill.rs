//! SurrealDB implementation of [`BillRepository`].
//!
//! Bill creation and its stock deductions run as one multi-statement
//! transaction. The `stock >= 0` schema assertion cancels the whole
//! transaction on underflow, so a failed deduction never leaves a bill
//! behind.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vendo_core::error::VendoResult;
use vendo_core::models::bill::{Bill, BillItem, CreateBill, PaymentMethod, StockDeduction};
use vendo_core::repository::{BillRepository, PaginatedResult, Pagination};

use crate::error::DbError;

/// Embedded line item as stored.
#[derive(Debug, SurrealValue)]
struct BillItemRow {
    item_id: String,
    name: String,
    quantity: u32,
    price: f64,
    total: f64,
}

impl BillItemRow {
    fn from_item(item: &BillItem) -> Self {
        Self {
            item_id: item.item_id.to_string(),
            name: item.name.clone(),
            quantity: item.quantity,
            price: item.price,
            total: item.total,
        }
    }

    fn try_into_item(self) -> Result<BillItem, DbError> {
        let item_id = Uuid::parse_str(&self.item_id)
            .map_err(|e| DbError::Migration(format!("invalid item UUID: {e}")))?;
        Ok(BillItem {
            item_id,
            name: self.name,
            quantity: self.quantity,
            price: self.price,
            total: self.total,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct BillRowWithId {
    record_id: String,
    vendor_id: String,
    customer_id: Option<String>,
    items: Vec<BillItemRow>,
    total_amount: f64,
    discount: f64,
    extra_charges: f64,
    final_amount: f64,
    payment_method: String,
    created_at: DateTime<Utc>,
}

fn parse_payment_method(s: &str) -> Result<PaymentMethod, DbError> {
    match s {
        "Cash" => Ok(PaymentMethod::Cash),
        "Card" => Ok(PaymentMethod::Card),
        "Upi" => Ok(PaymentMethod::Upi),
        "Other" => Ok(PaymentMethod::Other),
        other => Err(DbError::Migration(format!(
            "unknown payment method: {other}"
        ))),
    }
}

fn payment_method_to_string(m: PaymentMethod) -> &'static str {
    match m {
        PaymentMethod::Cash => "Cash",
        PaymentMethod::Card => "Card",
        PaymentMethod::Upi => "Upi",
        PaymentMethod::Other => "Other",
    }
}

impl BillRowWithId {
    fn try_into_bill(self) -> Result<Bill, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        let customer_id = self
            .customer_id
            .map(|s| {
                Uuid::parse_str(&s)
                    .map_err(|e| DbError::Migration(format!("invalid customer UUID: {e}")))
            })
            .transpose()?;
        Ok(Bill {
            id,
            vendor_id,
            customer_id,
            items: self
                .items
                .into_iter()
                .map(BillItemRow::try_into_item)
                .collect::<Result<Vec<_>, DbError>>()?,
            total_amount: self.total_amount,
            discount: self.discount,
            extra_charges: self.extra_charges,
            final_amount: self.final_amount,
            payment_method: parse_payment_method(&self.payment_method)?,
            created_at: self.created_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Bill repository.
#[derive(Clone)]
pub struct SurrealBillRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealBillRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> BillRepository for SurrealBillRepository<C> {
    async fn create(&self, input: CreateBill, deductions: Vec<StockDeduction>) -> VendoResult<Bill> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // Stock decrements and the bill insert form one transaction.
        // A `stock >= 0` assertion failure on any deduction cancels the
        // whole query, so totals never go inconsistent with line items.
        let mut statements = vec!["BEGIN TRANSACTION".to_string()];
        for i in 0..deductions.len() {
            statements.push(format!(
                "UPDATE type::record('inventory_item', $ded_id_{i}) SET \
                 stock -= $ded_qty_{i}, updated_at = time::now() \
                 WHERE vendor_id = $vendor_id"
            ));
        }
        statements.push(
            "CREATE type::record('bill', $id) SET \
             vendor_id = $vendor_id, \
             customer_id = $customer_id, \
             items = $items, \
             total_amount = $total_amount, \
             discount = $discount, \
             extra_charges = $extra_charges, \
             final_amount = $final_amount, \
             payment_method = $payment_method"
                .to_string(),
        );
        statements.push("COMMIT TRANSACTION".to_string());

        let items: Vec<BillItemRow> = input.items.iter().map(BillItemRow::from_item).collect();

        let mut builder = self
            .db
            .query(statements.join(";\n"))
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", input.vendor_id.to_string()))
            .bind(("customer_id", input.customer_id.map(|v| v.to_string())))
            .bind(("items", items))
            .bind(("total_amount", input.total_amount))
            .bind(("discount", input.discount))
            .bind(("extra_charges", input.extra_charges))
            .bind(("final_amount", input.final_amount))
            .bind((
                "payment_method",
                payment_method_to_string(input.payment_method).to_string(),
            ));

        for (i, deduction) in deductions.iter().enumerate() {
            builder = builder
                .bind((
                    format!("ded_id_{i}"),
                    deduction.inventory_item_id.to_string(),
                ))
                .bind((format!("ded_qty_{i}"), deduction.quantity));
        }

        let result = builder.await.map_err(DbError::from)?;
        result
            .check()
            .map_err(|e| DbError::Conflict(format!("bill transaction failed: {e}")))?;

        // Re-read after commit; transaction statement indexing is not
        // relied upon.
        self.get(input.vendor_id, id).await
    }

    async fn get(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<Bill> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('bill', $id) \
                 WHERE vendor_id = $vendor_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BillRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "bill".into(),
            id: id_str,
        })?;

        Ok(row.try_into_bill()?)
    }

    async fn list(
        &self,
        vendor_id: Uuid,
        pagination: Pagination,
    ) -> VendoResult<PaginatedResult<Bill>> {
        let vendor_id_str = vendor_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM bill \
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
                "SELECT meta::id(id) AS record_id, * FROM bill \
                 WHERE vendor_id = $vendor_id \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("vendor_id", vendor_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BillRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_bill())
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
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> VendoResult<Vec<Bill>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM bill \
                 WHERE vendor_id = $vendor_id \
                 AND created_at >= $from AND created_at < $to \
                 ORDER BY created_at ASC",
            )
            .bind(("vendor_id", vendor_id.to_string()))
            .bind(("from", from))
            .bind(("to", to))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BillRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_bill())
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
