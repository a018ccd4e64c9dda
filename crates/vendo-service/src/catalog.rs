//! Catalog services: menu items and inventory.

use uuid::Uuid;
use vendo_core::context::TenantContext;
use vendo_core::error::VendoResult;
use vendo_core::models::inventory_item::{CreateInventoryItem, InventoryItem, UpdateInventoryItem};
use vendo_core::models::menu_item::{CreateMenuItem, MenuItem, UpdateMenuItem};
use vendo_core::repository::{InventoryRepository, MenuItemRepository, PaginatedResult, Pagination};

use crate::contract::{
    self, InventoryItemDraft, InventoryItemPatch, MenuItemDraft, MenuItemPatch, StockAdjustment,
};

pub struct MenuService<M: MenuItemRepository> {
    menu: M,
}

impl<M: MenuItemRepository> MenuService<M> {
    pub fn new(menu: M) -> Self {
        Self { menu }
    }

    pub async fn create(&self, ctx: &TenantContext, draft: MenuItemDraft) -> VendoResult<MenuItem> {
        ctx.require_active()?;
        contract::check(&draft)?;

        self.menu
            .create(CreateMenuItem {
                vendor_id: ctx.vendor_id,
                name: draft.name,
                description: draft.description,
                category: draft.category,
                price: draft.price,
                inventory_item_id: draft.inventory_item_id,
            })
            .await
    }

    pub async fn get(&self, ctx: &TenantContext, id: Uuid) -> VendoResult<MenuItem> {
        ctx.require_active()?;
        self.menu.get(ctx.vendor_id, id).await
    }

    pub async fn update(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        patch: MenuItemPatch,
    ) -> VendoResult<MenuItem> {
        ctx.require_active()?;
        contract::check(&patch)?;

        self.menu
            .update(
                ctx.vendor_id,
                id,
                UpdateMenuItem {
                    name: patch.name,
                    description: patch.description.map(Some),
                    category: patch.category,
                    price: patch.price,
                    is_available: patch.is_available,
                    inventory_item_id: patch.inventory_item_id.map(Some),
                },
            )
            .await
    }

    pub async fn delete(&self, ctx: &TenantContext, id: Uuid) -> VendoResult<()> {
        ctx.require_active()?;
        self.menu.delete(ctx.vendor_id, id).await
    }

    pub async fn list(
        &self,
        ctx: &TenantContext,
        pagination: Pagination,
    ) -> VendoResult<PaginatedResult<MenuItem>> {
        ctx.require_active()?;
        self.menu.list(ctx.vendor_id, pagination).await
    }
}

pub struct InventoryService<I: InventoryRepository> {
    inventory: I,
}

impl<I: InventoryRepository> InventoryService<I> {
    pub fn new(inventory: I) -> Self {
        Self { inventory }
    }

    pub async fn create(
        &self,
        ctx: &TenantContext,
        draft: InventoryItemDraft,
    ) -> VendoResult<InventoryItem> {
        ctx.require_active()?;
        contract::check(&draft)?;

        self.inventory
            .create(CreateInventoryItem {
                vendor_id: ctx.vendor_id,
                name: draft.name,
                unit: draft.unit,
                stock: draft.stock,
                low_stock_threshold: draft.low_stock_threshold,
            })
            .await
    }

    pub async fn get(&self, ctx: &TenantContext, id: Uuid) -> VendoResult<InventoryItem> {
        ctx.require_active()?;
        self.inventory.get(ctx.vendor_id, id).await
    }

    pub async fn update(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        patch: InventoryItemPatch,
    ) -> VendoResult<InventoryItem> {
        ctx.require_active()?;
        contract::check(&patch)?;

        self.inventory
            .update(
                ctx.vendor_id,
                id,
                UpdateInventoryItem {
                    name: patch.name,
                    unit: patch.unit,
                    low_stock_threshold: patch.low_stock_threshold,
                },
            )
            .await
    }

    /// Signed stock correction; underflow is a conflict.
    pub async fn adjust(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        adjustment: StockAdjustment,
    ) -> VendoResult<InventoryItem> {
        ctx.require_active()?;
        contract::check(&adjustment)?;
        self.inventory
            .adjust_stock(ctx.vendor_id, id, adjustment.delta)
            .await
    }

    pub async fn delete(&self, ctx: &TenantContext, id: Uuid) -> VendoResult<()> {
        ctx.require_active()?;
        self.inventory.delete(ctx.vendor_id, id).await
    }

    pub async fn list(
        &self,
        ctx: &TenantContext,
        pagination: Pagination,
    ) -> VendoResult<PaginatedResult<InventoryItem>> {
        ctx.require_active()?;
        self.inventory.list(ctx.vendor_id, pagination).await
    }

    pub async fn list_low_stock(&self, ctx: &TenantContext) -> VendoResult<Vec<InventoryItem>> {
        ctx.require_active()?;
        self.inventory.list_low_stock(ctx.vendor_id).await
    }
}
