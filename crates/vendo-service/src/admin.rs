//! Admin surface — onboarding transitions and cross-tenant listing.
//!
//! Every operation here checks `is_admin` before doing anything; a
//! non-admin caller gets `Forbidden`, never a silent empty result. A
//! vendor cannot self-promote because no other surface reaches these
//! repository methods.

use tracing::info;
use uuid::Uuid;
use vendo_core::context::TenantContext;
use vendo_core::error::{VendoError, VendoResult};
use vendo_core::models::profile::{OnboardingStatus, Profile};
use vendo_core::repository::{PaginatedResult, Pagination, ProfileRepository};

/// Admin service over vendor profiles.
pub struct AdminService<P: ProfileRepository> {
    profiles: P,
}

impl<P: ProfileRepository> AdminService<P> {
    pub fn new(profiles: P) -> Self {
        Self { profiles }
    }

    /// Cross-tenant profile listing.
    pub async fn list_profiles(
        &self,
        ctx: &TenantContext,
        pagination: Pagination,
    ) -> VendoResult<PaginatedResult<Profile>> {
        ctx.require_admin()?;
        self.profiles.list(pagination).await
    }

    /// Apply an onboarding transition. Anything outside the transition
    /// table is rejected before the store is touched.
    pub async fn set_status(
        &self,
        ctx: &TenantContext,
        profile_id: Uuid,
        next: OnboardingStatus,
    ) -> VendoResult<Profile> {
        ctx.require_admin()?;

        let profile = self.profiles.get_by_id(profile_id).await?;
        let current = profile.onboarding_status;
        if !current.can_transition_to(next) {
            return Err(VendoError::validation(
                "onboarding_status",
                format!("illegal transition {current:?} -> {next:?}"),
            ));
        }

        let updated = self.profiles.set_status(profile_id, next).await?;
        info!(
            vendor_id = %profile_id,
            from = ?current,
            to = ?next,
            "Onboarding status changed"
        );
        Ok(updated)
    }

    /// Approve a pending (or corrected) vendor.
    pub async fn approve(&self, ctx: &TenantContext, profile_id: Uuid) -> VendoResult<Profile> {
        self.set_status(ctx, profile_id, OnboardingStatus::Active)
            .await
    }

    /// Reject a pending vendor.
    pub async fn reject(&self, ctx: &TenantContext, profile_id: Uuid) -> VendoResult<Profile> {
        self.set_status(ctx, profile_id, OnboardingStatus::Rejected)
            .await
    }

    /// Correction path: put a rejected vendor back in the queue.
    pub async fn reopen(&self, ctx: &TenantContext, profile_id: Uuid) -> VendoResult<Profile> {
        self.set_status(ctx, profile_id, OnboardingStatus::Pending)
            .await
    }

    /// Grant or revoke the admin flag on a profile.
    pub async fn set_admin(
        &self,
        ctx: &TenantContext,
        profile_id: Uuid,
        is_admin: bool,
    ) -> VendoResult<Profile> {
        ctx.require_admin()?;
        self.profiles.set_admin(profile_id, is_admin).await
    }
}
