//! Billing orchestration.
//!
//! A bill draft carries only item references and field-driven
//! adjustments. Names, prices, line totals, and the final amount are
//! always recomputed from the vendor's own menu; nothing numeric is
//! trusted from client input beyond discount and extra charges, which
//! are validated as non-negative by the contract layer.

use std::collections::HashMap;

use tracing::{info, warn};
use uuid::Uuid;
use vendo_core::context::TenantContext;
use vendo_core::error::{VendoError, VendoResult};
use vendo_core::models::bill::{self, Bill, BillItem, CreateBill, StockDeduction};
use vendo_core::models::loyalty::CreateLoyaltyPoint;
use vendo_core::models::notification::CreateNotification;
use vendo_core::repository::{
    BillRepository, CustomerRepository, InventoryRepository, LoyaltyPointRepository,
    MenuItemRepository, NotificationRepository, PaginatedResult, Pagination,
};

use crate::config::BillingConfig;
use crate::contract::{self, BillDraft};

pub struct BillingService<B, M, C, I, L, N>
where
    B: BillRepository,
    M: MenuItemRepository,
    C: CustomerRepository,
    I: InventoryRepository,
    L: LoyaltyPointRepository,
    N: NotificationRepository,
{
    bills: B,
    menu: M,
    customers: C,
    inventory: I,
    points: L,
    notifications: N,
    config: BillingConfig,
}

impl<B, M, C, I, L, N> BillingService<B, M, C, I, L, N>
where
    B: BillRepository,
    M: MenuItemRepository,
    C: CustomerRepository,
    I: InventoryRepository,
    L: LoyaltyPointRepository,
    N: NotificationRepository,
{
    pub fn new(
        bills: B,
        menu: M,
        customers: C,
        inventory: I,
        points: L,
        notifications: N,
        config: BillingConfig,
    ) -> Self {
        Self {
            bills,
            menu,
            customers,
            inventory,
            points,
            notifications,
            config,
        }
    }

    /// Create a bill for the calling vendor.
    pub async fn create_bill(&self, ctx: &TenantContext, draft: BillDraft) -> VendoResult<Bill> {
        // 1. Gate and shape validation, before any store access.
        ctx.require_active()?;
        contract::check(&draft)?;

        // 2. Resolve the customer (if any) within scope before writing
        //    anything.
        if let Some(customer_id) = draft.customer_id {
            self.customers.get(ctx.vendor_id, customer_id).await?;
        }

        // 3. Denormalize line items from the menu. A foreign or unknown
        //    item id misses the vendor filter and surfaces as NotFound.
        let mut items = Vec::with_capacity(draft.lines.len());
        let mut total_amount = 0.0;
        let mut deduction_map: HashMap<Uuid, f64> = HashMap::new();

        for line in &draft.lines {
            let menu_item = self.menu.get(ctx.vendor_id, line.item_id).await?;
            if !menu_item.is_available {
                return Err(VendoError::validation(
                    "lines",
                    format!("menu item '{}' is not available", menu_item.name),
                ));
            }

            let line_total = menu_item.price * f64::from(line.quantity);
            total_amount += line_total;
            items.push(BillItem {
                item_id: menu_item.id,
                name: menu_item.name,
                quantity: line.quantity,
                price: menu_item.price,
                total: line_total,
            });

            if let Some(inventory_item_id) = menu_item.inventory_item_id {
                *deduction_map.entry(inventory_item_id).or_insert(0.0) +=
                    f64::from(line.quantity);
            }
        }

        // 4. Pre-check stock so underflow reports as a conflict; the
        //    schema assertion still guards the transaction itself.
        let mut deductions = Vec::with_capacity(deduction_map.len());
        for (inventory_item_id, quantity) in deduction_map {
            let item = self.inventory.get(ctx.vendor_id, inventory_item_id).await?;
            if item.stock < quantity {
                return Err(VendoError::Conflict {
                    reason: format!(
                        "insufficient stock for {}: have {}, need {}",
                        item.name, item.stock, quantity
                    ),
                });
            }
            deductions.push(StockDeduction {
                inventory_item_id,
                quantity,
            });
        }

        // 5. Recompute totals server-side.
        let final_amount = bill::final_amount(total_amount, draft.discount, draft.extra_charges);

        // 6. Atomic create: bill plus stock decrements.
        let created = self
            .bills
            .create(
                CreateBill {
                    vendor_id: ctx.vendor_id,
                    customer_id: draft.customer_id,
                    items,
                    total_amount,
                    discount: draft.discount,
                    extra_charges: draft.extra_charges,
                    final_amount,
                    payment_method: draft.payment_method,
                },
                deductions.clone(),
            )
            .await?;

        info!(
            vendor_id = %ctx.vendor_id,
            bill_id = %created.id,
            final_amount = created.final_amount,
            "Bill created"
        );

        // 7. Visit tracking and loyalty accrual for attached customers.
        if let Some(customer_id) = created.customer_id {
            self.customers
                .record_visit(ctx.vendor_id, customer_id, created.final_amount)
                .await?;

            let earned = (created.final_amount * self.config.loyalty_earn_rate).floor() as i64;
            if earned > 0 {
                self.points
                    .append(
                        ctx.vendor_id,
                        CreateLoyaltyPoint {
                            customer_id,
                            points: earned,
                            reason: format!("bill {}", created.id),
                        },
                    )
                    .await?;
            }
        }

        // 8. Low-stock alerts for items the sale just drained.
        if self.config.low_stock_alerts {
            for deduction in &deductions {
                let item = self
                    .inventory
                    .get(ctx.vendor_id, deduction.inventory_item_id)
                    .await?;
                if item.stock <= item.low_stock_threshold {
                    warn!(
                        vendor_id = %ctx.vendor_id,
                        item = %item.name,
                        stock = item.stock,
                        "Inventory item is low on stock"
                    );
                    self.notifications
                        .create(CreateNotification {
                            vendor_id: ctx.vendor_id,
                            title: "Low stock".into(),
                            body: format!(
                                "{} is down to {} {}",
                                item.name, item.stock, item.unit
                            ),
                        })
                        .await?;
                }
            }
        }

        Ok(created)
    }

    pub async fn get_bill(&self, ctx: &TenantContext, id: Uuid) -> VendoResult<Bill> {
        ctx.require_active()?;
        self.bills.get(ctx.vendor_id, id).await
    }

    pub async fn list_bills(
        &self,
        ctx: &TenantContext,
        pagination: Pagination,
    ) -> VendoResult<PaginatedResult<Bill>> {
        ctx.require_active()?;
        self.bills.list(ctx.vendor_id, pagination).await
    }
}
