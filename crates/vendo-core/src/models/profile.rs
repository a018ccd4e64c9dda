//! Vendor profile domain model and the onboarding state machine.
//!
//! A profile is the tenant: one per external auth subject. All owned
//! entities reference a profile through their `vendor_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Approval lifecycle of a vendor profile.
///
/// New profiles start `Pending`. Transitions are admin-triggered only;
/// a vendor can never change its own status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnboardingStatus {
    Pending,
    Active,
    Rejected,
}

impl OnboardingStatus {
    /// Explicit transition table. Anything not listed here is illegal,
    /// including identity transitions.
    ///
    /// `Rejected -> Pending` and `Rejected -> Active` exist as admin
    /// corrections; `Active` has no outgoing transitions.
    pub fn can_transition_to(self, next: OnboardingStatus) -> bool {
        use OnboardingStatus::*;
        matches!(
            (self, next),
            (Pending, Active) | (Pending, Rejected) | (Rejected, Pending) | (Rejected, Active)
        )
    }
}

/// A vendor account and its business metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    /// External auth subject this profile belongs to. Exactly one profile
    /// exists per subject.
    pub subject: String,
    pub business_name: String,
    pub owner_name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    pub onboarding_status: OnboardingStatus,
    pub is_admin: bool,
    /// Enabled feature flags for this vendor.
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new profile.
///
/// Status is always stamped `Pending` and `is_admin` false at creation;
/// neither is accepted as input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfile {
    pub subject: String,
    pub business_name: String,
    pub owner_name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
}

/// Fields a vendor may change on its own profile. Absent fields are left
/// unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub business_name: Option<String>,
    pub owner_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub address: Option<Option<String>>,
    pub features: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::OnboardingStatus::*;

    #[test]
    fn admin_transitions_allowed() {
        assert!(Pending.can_transition_to(Active));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Rejected.can_transition_to(Pending));
        assert!(Rejected.can_transition_to(Active));
    }

    #[test]
    fn active_is_terminal() {
        assert!(!Active.can_transition_to(Pending));
        assert!(!Active.can_transition_to(Rejected));
    }

    #[test]
    fn identity_transitions_rejected() {
        for s in [Pending, Active, Rejected] {
            assert!(!s.can_transition_to(s));
        }
    }
}
