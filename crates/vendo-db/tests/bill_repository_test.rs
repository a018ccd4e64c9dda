//! Integration tests for the Bill repository: persisted totals, atomic
//! stock deductions, and tenant isolation, using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;
use vendo_core::error::VendoError;
use vendo_core::models::bill::{BillItem, CreateBill, PaymentMethod, StockDeduction};
use vendo_core::models::inventory_item::CreateInventoryItem;
use vendo_core::models::profile::CreateProfile;
use vendo_core::repository::{BillRepository, InventoryRepository, Pagination, ProfileRepository};
use vendo_db::repository::{
    SurrealBillRepository, SurrealInventoryRepository, SurrealProfileRepository,
};

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

fn tea_bill(vendor_id: Uuid) -> CreateBill {
    let item_id = Uuid::new_v4();
    CreateBill {
        vendor_id,
        customer_id: None,
        items: vec![BillItem {
            item_id,
            name: "Masala Chai".into(),
            quantity: 4,
            price: 25.0,
            total: 100.0,
        }],
        total_amount: 100.0,
        discount: 10.0,
        extra_charges: 5.0,
        final_amount: 95.0,
        payment_method: PaymentMethod::Cash,
    }
}

#[tokio::test]
async fn create_persists_items_and_totals() {
    let (db, vendor_a, _) = setup().await;
    let repo = SurrealBillRepository::new(db);

    let bill = repo.create(tea_bill(vendor_a), Vec::new()).await.unwrap();

    assert_eq!(bill.vendor_id, vendor_a);
    assert_eq!(bill.items.len(), 1);
    assert_eq!(bill.items[0].name, "Masala Chai");
    assert_eq!(bill.items[0].quantity, 4);
    assert_eq!(bill.total_amount, 100.0);
    assert_eq!(bill.discount, 10.0);
    assert_eq!(bill.extra_charges, 5.0);
    assert_eq!(bill.final_amount, 95.0);
    assert_eq!(bill.payment_method, PaymentMethod::Cash);
}

#[tokio::test]
async fn create_decrements_linked_stock() {
    let (db, vendor_a, _) = setup().await;
    let bills = SurrealBillRepository::new(db.clone());
    let inventory = SurrealInventoryRepository::new(db);

    let milk = inventory
        .create(CreateInventoryItem {
            vendor_id: vendor_a,
            name: "Milk".into(),
            unit: "l".into(),
            stock: 10.0,
            low_stock_threshold: 2.0,
        })
        .await
        .unwrap();

    bills
        .create(
            tea_bill(vendor_a),
            vec![StockDeduction {
                inventory_item_id: milk.id,
                quantity: 4.0,
            }],
        )
        .await
        .unwrap();

    let after = inventory.get(vendor_a, milk.id).await.unwrap();
    assert_eq!(after.stock, 6.0);
}

#[tokio::test]
async fn stock_underflow_rolls_back_the_bill() {
    let (db, vendor_a, _) = setup().await;
    let bills = SurrealBillRepository::new(db.clone());
    let inventory = SurrealInventoryRepository::new(db);

    let milk = inventory
        .create(CreateInventoryItem {
            vendor_id: vendor_a,
            name: "Milk".into(),
            unit: "l".into(),
            stock: 2.0,
            low_stock_threshold: 1.0,
        })
        .await
        .unwrap();

    let result = bills
        .create(
            tea_bill(vendor_a),
            vec![StockDeduction {
                inventory_item_id: milk.id,
                quantity: 4.0,
            }],
        )
        .await;
    assert!(result.is_err(), "underflow must fail the transaction");

    // Stock is untouched and no bill was written.
    let after = inventory.get(vendor_a, milk.id).await.unwrap();
    assert_eq!(after.stock, 2.0);

    let page = bills.list(vendor_a, Pagination::default()).await.unwrap();
    assert_eq!(page.total, 0, "failed transaction must not leave a bill");
}

#[tokio::test]
async fn tenant_isolation_on_bill_read() {
    let (db, vendor_a, vendor_b) = setup().await;
    let repo = SurrealBillRepository::new(db);

    let bill = repo.create(tea_bill(vendor_a), Vec::new()).await.unwrap();

    assert!(repo.get(vendor_a, bill.id).await.is_ok());

    let err = repo.get(vendor_b, bill.id).await.unwrap_err();
    assert!(matches!(err, VendoError::NotFound { .. }));
}

#[tokio::test]
async fn list_between_bounds_the_window() {
    let (db, vendor_a, vendor_b) = setup().await;
    let repo = SurrealBillRepository::new(db);

    repo.create(tea_bill(vendor_a), Vec::new()).await.unwrap();
    repo.create(tea_bill(vendor_a), Vec::new()).await.unwrap();
    repo.create(tea_bill(vendor_b), Vec::new()).await.unwrap();

    let now = chrono::Utc::now();
    let in_window = repo
        .list_between(
            vendor_a,
            now - chrono::Duration::hours(1),
            now + chrono::Duration::hours(1),
        )
        .await
        .unwrap();
    assert_eq!(in_window.len(), 2);

    let before_window = repo
        .list_between(
            vendor_a,
            now - chrono::Duration::hours(3),
            now - chrono::Duration::hours(2),
        )
        .await
        .unwrap();
    assert!(before_window.is_empty());
}
