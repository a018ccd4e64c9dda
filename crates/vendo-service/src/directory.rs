//! Customer directory service.
//!
//! Every operation gates on an `Active` onboarding status and stamps the
//! caller's vendor id onto writes; the contract DTOs carry no vendor
//! field, so nothing a client sends can change ownership.

use uuid::Uuid;
use vendo_core::context::TenantContext;
use vendo_core::error::VendoResult;
use vendo_core::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use vendo_core::repository::{CustomerRepository, PaginatedResult, Pagination};

use crate::contract::{self, CustomerDraft, CustomerPatch};

pub struct CustomerService<C: CustomerRepository> {
    customers: C,
}

impl<C: CustomerRepository> CustomerService<C> {
    pub fn new(customers: C) -> Self {
        Self { customers }
    }

    pub async fn create(&self, ctx: &TenantContext, draft: CustomerDraft) -> VendoResult<Customer> {
        ctx.require_active()?;
        contract::check(&draft)?;

        self.customers
            .create(CreateCustomer {
                vendor_id: ctx.vendor_id,
                name: draft.name,
                phone: draft.phone,
                email: draft.email,
                notes: draft.notes,
            })
            .await
    }

    pub async fn get(&self, ctx: &TenantContext, id: Uuid) -> VendoResult<Customer> {
        ctx.require_active()?;
        self.customers.get(ctx.vendor_id, id).await
    }

    pub async fn update(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        patch: CustomerPatch,
    ) -> VendoResult<Customer> {
        ctx.require_active()?;
        contract::check(&patch)?;

        self.customers
            .update(
                ctx.vendor_id,
                id,
                UpdateCustomer {
                    name: patch.name,
                    phone: patch.phone,
                    email: patch.email.map(Some),
                    notes: patch.notes.map(Some),
                },
            )
            .await
    }

    pub async fn delete(&self, ctx: &TenantContext, id: Uuid) -> VendoResult<()> {
        ctx.require_active()?;
        self.customers.delete(ctx.vendor_id, id).await
    }

    pub async fn list(
        &self,
        ctx: &TenantContext,
        pagination: Pagination,
    ) -> VendoResult<PaginatedResult<Customer>> {
        ctx.require_active()?;
        self.customers.list(ctx.vendor_id, pagination).await
    }
}
