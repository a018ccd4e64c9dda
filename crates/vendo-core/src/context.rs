//! Explicit per-request tenant identity.
//!
//! The context is resolved once from the authenticated subject and passed
//! as a parameter into every service call. Nothing in the system reads
//! identity from ambient state.

use uuid::Uuid;

use crate::error::{VendoError, VendoResult};
use crate::models::profile::{OnboardingStatus, Profile};

/// Resolved identity of the calling vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    pub vendor_id: Uuid,
    pub is_admin: bool,
    pub status: OnboardingStatus,
}

impl TenantContext {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            vendor_id: profile.id,
            is_admin: profile.is_admin,
            status: profile.onboarding_status,
        }
    }

    /// Onboarding gate: every tenant-data operation except profile
    /// read/update requires an `Active` status.
    pub fn require_active(&self) -> VendoResult<()> {
        match self.status {
            OnboardingStatus::Active => Ok(()),
            status => Err(VendoError::NotApproved { status }),
        }
    }

    /// Admin surface gate, checked before any state-mutating or
    /// cross-tenant-listing admin operation.
    pub fn require_admin(&self) -> VendoResult<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(VendoError::Forbidden {
                reason: "admin privileges required".into(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(status: OnboardingStatus, is_admin: bool) -> TenantContext {
        TenantContext {
            vendor_id: Uuid::new_v4(),
            is_admin,
            status,
        }
    }

    #[test]
    fn pending_vendor_is_gated() {
        let err = ctx(OnboardingStatus::Pending, false)
            .require_active()
            .unwrap_err();
        assert!(matches!(
            err,
            VendoError::NotApproved {
                status: OnboardingStatus::Pending
            }
        ));
    }

    #[test]
    fn active_vendor_passes_gate() {
        assert!(ctx(OnboardingStatus::Active, false).require_active().is_ok());
    }

    #[test]
    fn non_admin_is_forbidden() {
        let err = ctx(OnboardingStatus::Active, false)
            .require_admin()
            .unwrap_err();
        assert!(matches!(err, VendoError::Forbidden { .. }));
    }

    #[test]
    fn admin_passes_even_while_pending() {
        assert!(ctx(OnboardingStatus::Pending, true).require_admin().is_ok());
    }
}
