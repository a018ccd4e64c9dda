//! Identity resolution — mapping an authenticated subject to exactly
//! one vendor profile.
//!
//! The authentication collaborator is trusted to supply the subject;
//! this service never sees credentials. A subject seen for the first
//! time gets a profile in `Pending` status. Profile read/update is the
//! one surface that stays open while a vendor awaits approval.

use tracing::info;
use vendo_core::context::TenantContext;
use vendo_core::error::{VendoError, VendoResult};
use vendo_core::models::profile::{CreateProfile, Profile, UpdateProfile};
use vendo_core::repository::ProfileRepository;

use crate::contract::{self, ProfileDraft, ProfilePatch};

/// Identity and profile service.
///
/// Generic over the repository implementation so this layer has no
/// dependency on the database crate.
pub struct IdentityService<P: ProfileRepository> {
    profiles: P,
}

impl<P: ProfileRepository> IdentityService<P> {
    pub fn new(profiles: P) -> Self {
        Self { profiles }
    }

    /// Register a subject on first sight, or return the existing
    /// profile. Creation always lands in `Pending` status.
    pub async fn register(&self, subject: &str, draft: ProfileDraft) -> VendoResult<Profile> {
        contract::check(&draft)?;

        match self.profiles.get_by_subject(subject).await {
            Ok(existing) => return Ok(existing),
            Err(VendoError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let created = self
            .profiles
            .create(CreateProfile {
                subject: subject.to_string(),
                business_name: draft.business_name,
                owner_name: draft.owner_name,
                phone: draft.phone,
                email: draft.email,
                address: draft.address,
            })
            .await;

        match created {
            Ok(profile) => {
                info!(vendor_id = %profile.id, "Registered new vendor profile");
                Ok(profile)
            }
            // A concurrent first-sight registration may have won the
            // unique-subject race; the existing row is the answer.
            Err(_) => self.profiles.get_by_subject(subject).await,
        }
    }

    /// Resolve a subject into the explicit per-request context. Works
    /// for any onboarding status; the gate is applied per operation,
    /// not here.
    pub async fn resolve(&self, subject: &str) -> VendoResult<(Profile, TenantContext)> {
        let profile = self.profiles.get_by_subject(subject).await?;
        let ctx = TenantContext::from_profile(&profile);
        Ok((profile, ctx))
    }

    /// Read the caller's own profile. Open to pending vendors.
    pub async fn get_profile(&self, ctx: &TenantContext) -> VendoResult<Profile> {
        self.profiles.get_by_id(ctx.vendor_id).await
    }

    /// Update the caller's own profile. Open to pending vendors; the
    /// onboarding status and admin flag are not reachable from here.
    pub async fn update_profile(
        &self,
        ctx: &TenantContext,
        patch: ProfilePatch,
    ) -> VendoResult<Profile> {
        contract::check(&patch)?;

        self.profiles
            .update(
                ctx.vendor_id,
                UpdateProfile {
                    business_name: patch.business_name,
                    owner_name: patch.owner_name,
                    phone: patch.phone,
                    email: patch.email,
                    address: patch.address.map(Some),
                    features: patch.features,
                },
            )
            .await
    }
}
