//! Analytics aggregation over the calling tenant's own data.
//!
//! Growth figures compare the requested window against the immediately
//! preceding window of equal length. A zero baseline yields `None`,
//! never a division artifact.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vendo_core::context::TenantContext;
use vendo_core::error::{VendoError, VendoResult};
use vendo_core::repository::{BillRepository, CustomerRepository, ExpenseRepository};

/// Half-open aggregation window `[from, to)`.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopItem {
    pub item_id: Uuid,
    pub name: String,
    pub quantity: u64,
}

#[derive(Debug, Clone)]
pub struct AnalyticsSummary {
    pub revenue: f64,
    pub bill_count: u64,
    /// `None` when no bills fall in the window.
    pub average_bill_value: Option<f64>,
    pub new_customers: u64,
    pub expense_total: f64,
    /// Best-selling items by quantity, largest first.
    pub top_items: Vec<TopItem>,
    /// `None` when the preceding window had zero revenue.
    pub revenue_growth_pct: Option<f64>,
    /// `None` when the preceding window had zero bills.
    pub bill_count_growth_pct: Option<f64>,
}

/// Percentage change versus a baseline; undefined on a zero baseline.
fn growth_pct(current: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 {
        None
    } else {
        Some((current - baseline) / baseline * 100.0)
    }
}

const TOP_ITEMS: usize = 5;

pub struct AnalyticsService<B, C, E>
where
    B: BillRepository,
    C: CustomerRepository,
    E: ExpenseRepository,
{
    bills: B,
    customers: C,
    expenses: E,
}

impl<B, C, E> AnalyticsService<B, C, E>
where
    B: BillRepository,
    C: CustomerRepository,
    E: ExpenseRepository,
{
    pub fn new(bills: B, customers: C, expenses: E) -> Self {
        Self {
            bills,
            customers,
            expenses,
        }
    }

    pub async fn summary(
        &self,
        ctx: &TenantContext,
        window: AnalyticsWindow,
    ) -> VendoResult<AnalyticsSummary> {
        ctx.require_active()?;
        if window.to <= window.from {
            return Err(VendoError::validation(
                "window",
                "`to` must be after `from`",
            ));
        }

        let bills = self
            .bills
            .list_between(ctx.vendor_id, window.from, window.to)
            .await?;

        // Immediately preceding window of equal length.
        let span = window.to - window.from;
        let previous = self
            .bills
            .list_between(ctx.vendor_id, window.from - span, window.from)
            .await?;

        let revenue: f64 = bills.iter().map(|b| b.final_amount).sum();
        let bill_count = bills.len() as u64;
        let previous_revenue: f64 = previous.iter().map(|b| b.final_amount).sum();
        let previous_count = previous.len() as u64;

        let mut quantities: HashMap<Uuid, (String, u64)> = HashMap::new();
        for bill in &bills {
            for item in &bill.items {
                let entry = quantities
                    .entry(item.item_id)
                    .or_insert_with(|| (item.name.clone(), 0));
                entry.1 += u64::from(item.quantity);
            }
        }
        let mut top_items: Vec<TopItem> = quantities
            .into_iter()
            .map(|(item_id, (name, quantity))| TopItem {
                item_id,
                name,
                quantity,
            })
            .collect();
        top_items.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.name.cmp(&b.name)));
        top_items.truncate(TOP_ITEMS);

        let new_customers = self
            .customers
            .created_between(ctx.vendor_id, window.from, window.to)
            .await?;

        let expense_total: f64 = self
            .expenses
            .list_between(
                ctx.vendor_id,
                window.from.date_naive(),
                window.to.date_naive(),
            )
            .await?
            .iter()
            .map(|e| e.amount)
            .sum();

        Ok(AnalyticsSummary {
            revenue,
            bill_count,
            average_bill_value: if bill_count == 0 {
                None
            } else {
                Some(revenue / bill_count as f64)
            },
            new_customers,
            expense_total,
            top_items,
            revenue_growth_pct: growth_pct(revenue, previous_revenue),
            bill_count_growth_pct: growth_pct(bill_count as f64, previous_count as f64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::growth_pct;

    #[test]
    fn growth_is_undefined_on_zero_baseline() {
        assert_eq!(growth_pct(100.0, 0.0), None);
        assert_eq!(growth_pct(0.0, 0.0), None);
    }

    #[test]
    fn growth_against_nonzero_baseline() {
        assert_eq!(growth_pct(150.0, 100.0), Some(50.0));
        assert_eq!(growth_pct(50.0, 100.0), Some(-50.0));
        assert_eq!(growth_pct(100.0, 100.0), Some(0.0));
    }
}
