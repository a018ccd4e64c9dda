//! Integration tests for identity resolution and the onboarding state
//! machine, wired over in-memory SurrealDB repositories.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use vendo_core::context::TenantContext;
use vendo_core::error::VendoError;
use vendo_core::models::profile::OnboardingStatus;
use vendo_core::repository::{Pagination, ProfileRepository};
use vendo_db::repository::{SurrealCustomerRepository, SurrealProfileRepository};
use vendo_service::contract::{CustomerDraft, ProfileDraft, ProfilePatch};
use vendo_service::{AdminService, CustomerService, IdentityService};

type Db = surrealdb::engine::local::Db;

/// Helper: in-memory DB with one registered (pending) vendor and one
/// seeded admin.
async fn setup() -> (
    Surreal<Db>,
    IdentityService<SurrealProfileRepository<Db>>,
    AdminService<SurrealProfileRepository<Db>>,
    uuid::Uuid,    // pending vendor profile id
    TenantContext, // pending vendor ctx
    TenantContext, // admin ctx
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vendo_db::run_migrations(&db).await.unwrap();

    let profiles = SurrealProfileRepository::new(db.clone());
    let identity = IdentityService::new(profiles.clone());
    let admin_svc = AdminService::new(profiles.clone());

    let vendor = identity
        .register("auth0|vendor-x", chai_point())
        .await
        .unwrap();
    let (_, vendor_ctx) = identity.resolve("auth0|vendor-x").await.unwrap();

    // Bootstrap admin: seeded at the repository level, the way a
    // deployment seeds its first operator.
    let admin = identity
        .register("auth0|operator", admin_draft())
        .await
        .unwrap();
    profiles.set_admin(admin.id, true).await.unwrap();
    let (_, admin_ctx) = identity.resolve("auth0|operator").await.unwrap();

    (db, identity, admin_svc, vendor.id, vendor_ctx, admin_ctx)
}

fn chai_point() -> ProfileDraft {
    ProfileDraft {
        business_name: "Chai Point".into(),
        owner_name: "Asha".into(),
        phone: "9000000001".into(),
        email: "asha@example.com".into(),
        address: None,
    }
}

fn admin_draft() -> ProfileDraft {
    ProfileDraft {
        business_name: "Vendo Ops".into(),
        owner_name: "Operator".into(),
        phone: "9000000099".into(),
        email: "ops@example.com".into(),
        address: None,
    }
}

#[tokio::test]
async fn first_sight_registration_is_pending() {
    let (_db, identity, _, vendor_id, vendor_ctx, _) = setup().await;

    assert_eq!(vendor_ctx.status, OnboardingStatus::Pending);
    assert!(!vendor_ctx.is_admin);

    // Registering the same subject again returns the same profile.
    let again = identity
        .register("auth0|vendor-x", chai_point())
        .await
        .unwrap();
    assert_eq!(again.id, vendor_id);
}

#[tokio::test]
async fn pending_vendor_is_gated_from_tenant_data() {
    let (db, _, _, _, vendor_ctx, _) = setup().await;
    let customers = CustomerService::new(SurrealCustomerRepository::new(db));

    let err = customers
        .create(
            &vendor_ctx,
            CustomerDraft {
                name: "Ravi".into(),
                phone: "9999999999".into(),
                email: None,
                notes: None,
            },
        )
        .await
        .unwrap_err();

    // A gating error, not a validation error and not an auth failure.
    assert!(matches!(
        err,
        VendoError::NotApproved {
            status: OnboardingStatus::Pending
        }
    ));
}

#[tokio::test]
async fn profile_read_and_update_stay_open_while_pending() {
    let (_db, identity, _, _, vendor_ctx, _) = setup().await;

    let profile = identity.get_profile(&vendor_ctx).await.unwrap();
    assert_eq!(profile.business_name, "Chai Point");

    let updated = identity
        .update_profile(
            &vendor_ctx,
            ProfilePatch {
                business_name: Some("Chai Palace".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.business_name, "Chai Palace");
    assert_eq!(updated.onboarding_status, OnboardingStatus::Pending);
}

#[tokio::test]
async fn approval_unlocks_tenant_data() {
    let (db, identity, admin_svc, vendor_id, _, admin_ctx) = setup().await;

    admin_svc.approve(&admin_ctx, vendor_id).await.unwrap();

    let (_, ctx) = identity.resolve("auth0|vendor-x").await.unwrap();
    assert_eq!(ctx.status, OnboardingStatus::Active);

    let customers = CustomerService::new(SurrealCustomerRepository::new(db));
    let customer = customers
        .create(
            &ctx,
            CustomerDraft {
                name: "Ravi".into(),
                phone: "9999999999".into(),
                email: None,
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(customer.vendor_id, vendor_id);
    assert_eq!(customer.visit_count, 0);
}

#[tokio::test]
async fn non_admin_cannot_transition() {
    let (_db, _, admin_svc, vendor_id, vendor_ctx, _) = setup().await;

    let err = admin_svc
        .approve(&vendor_ctx, vendor_id)
        .await
        .unwrap_err();
    assert!(
        matches!(err, VendoError::Forbidden { .. }),
        "a vendor must not self-promote"
    );
}

#[tokio::test]
async fn non_admin_listing_is_forbidden_not_empty() {
    let (_db, _, admin_svc, _, vendor_ctx, admin_ctx) = setup().await;

    let err = admin_svc
        .list_profiles(&vendor_ctx, Pagination::default())
        .await
        .unwrap_err();
    assert!(matches!(err, VendoError::Forbidden { .. }));

    let page = admin_svc
        .list_profiles(&admin_ctx, Pagination::default())
        .await
        .unwrap();
    assert!(page.total >= 2);
}

#[tokio::test]
async fn transitions_outside_the_table_are_rejected() {
    let (_db, _, admin_svc, vendor_id, _, admin_ctx) = setup().await;

    admin_svc.approve(&admin_ctx, vendor_id).await.unwrap();

    // Active is terminal: no demotion, no re-approval.
    let err = admin_svc
        .reopen(&admin_ctx, vendor_id)
        .await
        .unwrap_err();
    assert!(matches!(err, VendoError::Validation { .. }));

    let err = admin_svc
        .approve(&admin_ctx, vendor_id)
        .await
        .unwrap_err();
    assert!(matches!(err, VendoError::Validation { .. }));
}

#[tokio::test]
async fn rejection_gates_and_can_be_corrected() {
    let (db, identity, admin_svc, vendor_id, _, admin_ctx) = setup().await;

    admin_svc.reject(&admin_ctx, vendor_id).await.unwrap();

    let (_, ctx) = identity.resolve("auth0|vendor-x").await.unwrap();
    let customers = CustomerService::new(SurrealCustomerRepository::new(db));
    let err = customers
        .create(
            &ctx,
            CustomerDraft {
                name: "Ravi".into(),
                phone: "9999999999".into(),
                email: None,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        VendoError::NotApproved {
            status: OnboardingStatus::Rejected
        }
    ));

    // Admin correction: rejected -> pending -> active.
    admin_svc.reopen(&admin_ctx, vendor_id).await.unwrap();
    let approved = admin_svc.approve(&admin_ctx, vendor_id).await.unwrap();
    assert_eq!(approved.onboarding_status, OnboardingStatus::Active);
}
