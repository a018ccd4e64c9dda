//! Integration tests for the contract layer: vendor stamping, dropped
//! client-supplied server fields, and short-circuiting validation.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use vendo_core::context::TenantContext;
use vendo_core::error::VendoError;
use vendo_core::models::profile::{CreateProfile, OnboardingStatus};
use vendo_core::repository::{Pagination, ProfileRepository};
use vendo_db::repository::{SurrealCustomerRepository, SurrealProfileRepository};
use vendo_service::CustomerService;
use vendo_service::contract::{BillDraft, CustomerDraft, CustomerPatch};

type Db = surrealdb::engine::local::Db;

/// Helper: in-memory DB with one active vendor.
async fn setup() -> (Surreal<Db>, TenantContext) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vendo_db::run_migrations(&db).await.unwrap();

    let profiles = SurrealProfileRepository::new(db.clone());
    let vendor = profiles
        .create(CreateProfile {
            subject: "auth0|vendor-x".into(),
            business_name: "Chai Point".into(),
            owner_name: "Asha".into(),
            phone: "9000000001".into(),
            email: "asha@example.com".into(),
            address: None,
        })
        .await
        .unwrap();
    profiles
        .set_status(vendor.id, OnboardingStatus::Active)
        .await
        .unwrap();

    (
        db,
        TenantContext {
            vendor_id: vendor.id,
            is_admin: false,
            status: OnboardingStatus::Active,
        },
    )
}

#[tokio::test]
async fn client_supplied_vendor_id_is_dropped() {
    let (db, ctx) = setup().await;
    let customers = CustomerService::new(SurrealCustomerRepository::new(db));

    // A request body trying to smuggle server-assigned fields. The
    // contract shape has no such fields, so they deserialize into
    // nothing.
    let body = serde_json::json!({
        "name": "Ravi",
        "phone": "9999999999",
        "vendorId": uuid::Uuid::new_v4(),
        "vendor_id": uuid::Uuid::new_v4(),
        "id": uuid::Uuid::new_v4(),
        "visitCount": 42,
    });
    let draft: CustomerDraft = serde_json::from_value(body).unwrap();

    let customer = customers.create(&ctx, draft).await.unwrap();

    // The caller's identity wins, and counters start at zero.
    assert_eq!(customer.vendor_id, ctx.vendor_id);
    assert_eq!(customer.visit_count, 0);
}

#[tokio::test]
async fn validation_short_circuits_before_any_write() {
    let (db, ctx) = setup().await;
    let customers = CustomerService::new(SurrealCustomerRepository::new(db));

    let err = customers
        .create(
            &ctx,
            CustomerDraft {
                name: "".into(),
                phone: "12".into(),
                email: Some("not-an-email".into()),
                notes: None,
            },
        )
        .await
        .unwrap_err();

    let VendoError::Validation { violations } = err else {
        panic!("expected validation error");
    };
    let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"phone"));
    assert!(fields.contains(&"email"));

    // Nothing was applied.
    let page = customers.list(&ctx, Pagination::default()).await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn bill_draft_requires_at_least_one_line() {
    let draft: BillDraft = serde_json::from_value(serde_json::json!({
        "lines": [],
        "payment_method": "Cash",
    }))
    .unwrap();

    let err = vendo_service::contract::check(&draft).unwrap_err();
    let VendoError::Validation { violations } = err else {
        panic!("expected validation error");
    };
    assert!(violations.iter().any(|v| v.field == "lines"));
}

#[tokio::test]
async fn nested_line_violations_carry_indexed_paths() {
    let draft: BillDraft = serde_json::from_value(serde_json::json!({
        "lines": [
            { "item_id": uuid::Uuid::new_v4(), "quantity": 1 },
            { "item_id": uuid::Uuid::new_v4(), "quantity": 0 },
        ],
        "payment_method": "Card",
    }))
    .unwrap();

    let err = vendo_service::contract::check(&draft).unwrap_err();
    let VendoError::Validation { violations } = err else {
        panic!("expected validation error");
    };
    assert!(
        violations.iter().any(|v| v.field.contains("lines[1]")),
        "violation should name the offending line: {violations:?}"
    );
}

#[tokio::test]
async fn patch_leaves_absent_fields_unchanged() {
    let (db, ctx) = setup().await;
    let customers = CustomerService::new(SurrealCustomerRepository::new(db));

    let customer = customers
        .create(
            &ctx,
            CustomerDraft {
                name: "Ravi".into(),
                phone: "9999999999".into(),
                email: Some("ravi@example.com".into()),
                notes: None,
            },
        )
        .await
        .unwrap();

    // The patch body only names `name`; everything else must survive.
    let patch: CustomerPatch =
        serde_json::from_value(serde_json::json!({ "name": "Ravi Kumar" })).unwrap();
    let updated = customers.update(&ctx, customer.id, patch).await.unwrap();

    assert_eq!(updated.name, "Ravi Kumar");
    assert_eq!(updated.phone, "9999999999");
    assert_eq!(updated.email.as_deref(), Some("ravi@example.com"));
}
