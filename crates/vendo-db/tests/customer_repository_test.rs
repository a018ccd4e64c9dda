//! Integration tests for the Customer repository, including the tenant
//! isolation properties, using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;
use vendo_core::error::VendoError;
use vendo_core::models::customer::{CreateCustomer, UpdateCustomer};
use vendo_core::models::profile::CreateProfile;
use vendo_core::repository::{CustomerRepository, Pagination, ProfileRepository};
use vendo_db::repository::{SurrealCustomerRepository, SurrealProfileRepository};

/// Helper: spin up in-memory DB, run migrations, create two vendors.
async fn setup() -> (
    Surreal<surrealdb::engine::local::Db>,
    Uuid, // vendor_a
    Uuid, // vendor_b
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vendo_db::run_migrations(&db).await.unwrap();

    let profiles = SurrealProfileRepository::new(db.clone());
    let vendor_a = profiles
        .create(CreateProfile {
            subject: "auth0|vendor-a".into(),
            business_name: "Chai Point".into(),
            owner_name: "Asha".into(),
            phone: "9000000001".into(),
            email: "asha@example.com".into(),
            address: None,
        })
        .await
        .unwrap();
    let vendor_b = profiles
        .create(CreateProfile {
            subject: "auth0|vendor-b".into(),
            business_name: "Dosa Corner".into(),
            owner_name: "Biju".into(),
            phone: "9000000002".into(),
            email: "biju@example.com".into(),
            address: None,
        })
        .await
        .unwrap();

    (db, vendor_a.id, vendor_b.id)
}

fn ravi(vendor_id: Uuid) -> CreateCustomer {
    CreateCustomer {
        vendor_id,
        name: "Ravi".into(),
        phone: "9999999999".into(),
        email: None,
        notes: None,
    }
}

#[tokio::test]
async fn create_stamps_vendor_and_zero_visits() {
    let (db, vendor_a, _) = setup().await;
    let repo = SurrealCustomerRepository::new(db);

    let customer = repo.create(ravi(vendor_a)).await.unwrap();

    assert_eq!(customer.vendor_id, vendor_a);
    assert_eq!(customer.name, "Ravi");
    assert_eq!(customer.phone, "9999999999");
    assert_eq!(customer.visit_count, 0);
    assert_eq!(customer.total_spent, 0.0);
    assert!(customer.last_visit_at.is_none());
}

#[tokio::test]
async fn tenant_isolation_on_read() {
    let (db, vendor_a, vendor_b) = setup().await;
    let repo = SurrealCustomerRepository::new(db);

    let customer = repo.create(ravi(vendor_a)).await.unwrap();

    // Owner can read it.
    assert!(repo.get(vendor_a, customer.id).await.is_ok());

    // Another vendor gets NotFound even with the exact primary key.
    let err = repo.get(vendor_b, customer.id).await.unwrap_err();
    assert!(
        matches!(err, VendoError::NotFound { .. }),
        "cross-tenant read must be indistinguishable from absence"
    );
}

#[tokio::test]
async fn tenant_isolation_on_update() {
    let (db, vendor_a, vendor_b) = setup().await;
    let repo = SurrealCustomerRepository::new(db);

    let customer = repo.create(ravi(vendor_a)).await.unwrap();

    let err = repo
        .update(
            vendor_b,
            customer.id,
            UpdateCustomer {
                name: Some("Hijacked".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, VendoError::NotFound { .. }));

    // The row is untouched.
    let fetched = repo.get(vendor_a, customer.id).await.unwrap();
    assert_eq!(fetched.name, "Ravi");
}

#[tokio::test]
async fn tenant_isolation_on_delete() {
    let (db, vendor_a, vendor_b) = setup().await;
    let repo = SurrealCustomerRepository::new(db);

    let customer = repo.create(ravi(vendor_a)).await.unwrap();

    let err = repo.delete(vendor_b, customer.id).await.unwrap_err();
    assert!(matches!(err, VendoError::NotFound { .. }));

    // Still there for the owner.
    assert!(repo.get(vendor_a, customer.id).await.is_ok());

    // And the owner can actually delete it.
    repo.delete(vendor_a, customer.id).await.unwrap();
    let err = repo.get(vendor_a, customer.id).await.unwrap_err();
    assert!(matches!(err, VendoError::NotFound { .. }));
}

#[tokio::test]
async fn list_is_scoped_per_vendor() {
    let (db, vendor_a, vendor_b) = setup().await;
    let repo = SurrealCustomerRepository::new(db);

    repo.create(ravi(vendor_a)).await.unwrap();
    repo.create(CreateCustomer {
        vendor_id: vendor_a,
        name: "Meena".into(),
        phone: "8888888888".into(),
        email: None,
        notes: None,
    })
    .await
    .unwrap();
    repo.create(CreateCustomer {
        vendor_id: vendor_b,
        name: "Kiran".into(),
        phone: "7777777777".into(),
        email: None,
        notes: None,
    })
    .await
    .unwrap();

    let page_a = repo.list(vendor_a, Pagination::default()).await.unwrap();
    assert_eq!(page_a.total, 2);
    assert!(page_a.items.iter().all(|c| c.vendor_id == vendor_a));

    let page_b = repo.list(vendor_b, Pagination::default()).await.unwrap();
    assert_eq!(page_b.total, 1);
    assert_eq!(page_b.items[0].name, "Kiran");
}

#[tokio::test]
async fn duplicate_phone_rejected_within_vendor() {
    let (db, vendor_a, vendor_b) = setup().await;
    let repo = SurrealCustomerRepository::new(db);

    repo.create(ravi(vendor_a)).await.unwrap();

    let result = repo
        .create(CreateCustomer {
            vendor_id: vendor_a,
            name: "Other Ravi".into(),
            phone: "9999999999".into(),
            email: None,
            notes: None,
        })
        .await;
    assert!(result.is_err(), "duplicate phone within a vendor rejected");

    // The same phone under a different vendor is fine.
    assert!(repo.create(ravi(vendor_b)).await.is_ok());
}

#[tokio::test]
async fn record_visit_updates_counters() {
    let (db, vendor_a, _) = setup().await;
    let repo = SurrealCustomerRepository::new(db);

    let customer = repo.create(ravi(vendor_a)).await.unwrap();

    let after_first = repo.record_visit(vendor_a, customer.id, 250.0).await.unwrap();
    assert_eq!(after_first.visit_count, 1);
    assert_eq!(after_first.total_spent, 250.0);
    assert!(after_first.last_visit_at.is_some());

    let after_second = repo.record_visit(vendor_a, customer.id, 50.0).await.unwrap();
    assert_eq!(after_second.visit_count, 2);
    assert_eq!(after_second.total_spent, 300.0);
}

#[tokio::test]
async fn update_patch_semantics() {
    let (db, vendor_a, _) = setup().await;
    let repo = SurrealCustomerRepository::new(db);

    let customer = repo
        .create(CreateCustomer {
            vendor_id: vendor_a,
            name: "Ravi".into(),
            phone: "9999999999".into(),
            email: Some("ravi@example.com".into()),
            notes: None,
        })
        .await
        .unwrap();

    let updated = repo
        .update(
            vendor_a,
            customer.id,
            UpdateCustomer {
                notes: Some(Some("regular, prefers window seat".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Ravi"); // unchanged
    assert_eq!(updated.email.as_deref(), Some("ravi@example.com")); // unchanged
    assert_eq!(
        updated.notes.as_deref(),
        Some("regular, prefers window seat")
    );
}
