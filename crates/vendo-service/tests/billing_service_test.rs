//! Integration tests for the billing orchestration: server-side totals,
//! atomic stock deductions, visit tracking, loyalty accrual, and
//! low-stock alerts.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;
use vendo_core::context::TenantContext;
use vendo_core::error::VendoError;
use vendo_core::models::profile::{CreateProfile, OnboardingStatus};
use vendo_core::repository::{
    CustomerRepository, InventoryRepository, LoyaltyPointRepository, MenuItemRepository,
    NotificationRepository, Pagination, ProfileRepository,
};
use vendo_core::models::customer::CreateCustomer;
use vendo_core::models::inventory_item::CreateInventoryItem;
use vendo_core::models::menu_item::CreateMenuItem;
use vendo_db::repository::{
    SurrealBillRepository, SurrealCustomerRepository, SurrealInventoryRepository,
    SurrealLoyaltyPointRepository, SurrealMenuItemRepository, SurrealNotificationRepository,
    SurrealProfileRepository,
};
use vendo_service::contract::{BillDraft, BillLineDraft};
use vendo_service::{BillingConfig, BillingService};
use vendo_core::models::bill::PaymentMethod;

type Db = surrealdb::engine::local::Db;

type TestBillingService = BillingService<
    SurrealBillRepository<Db>,
    SurrealMenuItemRepository<Db>,
    SurrealCustomerRepository<Db>,
    SurrealInventoryRepository<Db>,
    SurrealLoyaltyPointRepository<Db>,
    SurrealNotificationRepository<Db>,
>;

fn billing(db: &Surreal<Db>, config: BillingConfig) -> TestBillingService {
    BillingService::new(
        SurrealBillRepository::new(db.clone()),
        SurrealMenuItemRepository::new(db.clone()),
        SurrealCustomerRepository::new(db.clone()),
        SurrealInventoryRepository::new(db.clone()),
        SurrealLoyaltyPointRepository::new(db.clone()),
        SurrealNotificationRepository::new(db.clone()),
        config,
    )
}

/// Helper: in-memory DB with an active vendor and a small menu.
/// Returns the chai item (no inventory link) and the coffee item
/// (linked to a 10-unit bean stock).
async fn setup() -> (Surreal<Db>, TenantContext, Uuid, Uuid, Uuid) {
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

    let ctx = TenantContext {
        vendor_id: vendor.id,
        is_admin: false,
        status: OnboardingStatus::Active,
    };

    let inventory = SurrealInventoryRepository::new(db.clone());
    let beans = inventory
        .create(CreateInventoryItem {
            vendor_id: vendor.id,
            name: "Coffee Beans".into(),
            unit: "scoops".into(),
            stock: 10.0,
            low_stock_threshold: 3.0,
        })
        .await
        .unwrap();

    let menu = SurrealMenuItemRepository::new(db.clone());
    let chai = menu
        .create(CreateMenuItem {
            vendor_id: vendor.id,
            name: "Masala Chai".into(),
            description: None,
            category: "Beverages".into(),
            price: 25.0,
            inventory_item_id: None,
        })
        .await
        .unwrap();
    let coffee = menu
        .create(CreateMenuItem {
            vendor_id: vendor.id,
            name: "Filter Coffee".into(),
            description: None,
            category: "Beverages".into(),
            price: 40.0,
            inventory_item_id: Some(beans.id),
        })
        .await
        .unwrap();

    (db, ctx, chai.id, coffee.id, beans.id)
}

#[tokio::test]
async fn totals_are_recomputed_server_side() {
    let (db, ctx, chai_id, _, _) = setup().await;
    let svc = billing(&db, BillingConfig::default());

    let bill = svc
        .create_bill(
            &ctx,
            BillDraft {
                customer_id: None,
                lines: vec![BillLineDraft {
                    item_id: chai_id,
                    quantity: 4,
                }],
                discount: 10.0,
                extra_charges: 5.0,
                payment_method: PaymentMethod::Cash,
            },
        )
        .await
        .unwrap();

    // Name and price come from the menu, totals from arithmetic.
    assert_eq!(bill.items.len(), 1);
    assert_eq!(bill.items[0].name, "Masala Chai");
    assert_eq!(bill.items[0].price, 25.0);
    assert_eq!(bill.items[0].total, 100.0);
    assert_eq!(bill.total_amount, 100.0);
    assert_eq!(bill.final_amount, 95.0); // 100 - 10 + 5
}

#[tokio::test]
async fn sale_decrements_linked_stock() {
    let (db, ctx, _, coffee_id, beans_id) = setup().await;
    let svc = billing(&db, BillingConfig::default());

    svc.create_bill(
        &ctx,
        BillDraft {
            customer_id: None,
            lines: vec![BillLineDraft {
                item_id: coffee_id,
                quantity: 4,
            }],
            discount: 0.0,
            extra_charges: 0.0,
            payment_method: PaymentMethod::Upi,
        },
    )
    .await
    .unwrap();

    let inventory = SurrealInventoryRepository::new(db);
    let beans = inventory.get(ctx.vendor_id, beans_id).await.unwrap();
    assert_eq!(beans.stock, 6.0);
}

#[tokio::test]
async fn insufficient_stock_is_a_conflict_and_writes_nothing() {
    let (db, ctx, _, coffee_id, beans_id) = setup().await;
    let svc = billing(&db, BillingConfig::default());

    let err = svc
        .create_bill(
            &ctx,
            BillDraft {
                customer_id: None,
                lines: vec![BillLineDraft {
                    item_id: coffee_id,
                    quantity: 11,
                }],
                discount: 0.0,
                extra_charges: 0.0,
                payment_method: PaymentMethod::Cash,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, VendoError::Conflict { .. }));

    // No bill, no decrement.
    assert_eq!(
        svc.list_bills(&ctx, Pagination::default())
            .await
            .unwrap()
            .total,
        0
    );
    let inventory = SurrealInventoryRepository::new(db);
    assert_eq!(
        inventory.get(ctx.vendor_id, beans_id).await.unwrap().stock,
        10.0
    );
}

#[tokio::test]
async fn unavailable_item_fails_validation() {
    let (db, ctx, chai_id, _, _) = setup().await;

    let menu = SurrealMenuItemRepository::new(db.clone());
    menu.update(
        ctx.vendor_id,
        chai_id,
        vendo_core::models::menu_item::UpdateMenuItem {
            is_available: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let svc = billing(&db, BillingConfig::default());
    let err = svc
        .create_bill(
            &ctx,
            BillDraft {
                customer_id: None,
                lines: vec![BillLineDraft {
                    item_id: chai_id,
                    quantity: 1,
                }],
                discount: 0.0,
                extra_charges: 0.0,
                payment_method: PaymentMethod::Cash,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, VendoError::Validation { .. }));
}

#[tokio::test]
async fn foreign_menu_item_is_not_found() {
    let (db, ctx, _, _, _) = setup().await;

    // A second vendor's menu item.
    let profiles = SurrealProfileRepository::new(db.clone());
    let other = profiles
        .create(CreateProfile {
            subject: "auth0|vendor-y".into(),
            business_name: "Dosa Corner".into(),
            owner_name: "Biju".into(),
            phone: "9000000002".into(),
            email: "biju@example.com".into(),
            address: None,
        })
        .await
        .unwrap();
    let menu = SurrealMenuItemRepository::new(db.clone());
    let foreign = menu
        .create(CreateMenuItem {
            vendor_id: other.id,
            name: "Plain Dosa".into(),
            description: None,
            category: "Food".into(),
            price: 60.0,
            inventory_item_id: None,
        })
        .await
        .unwrap();

    let svc = billing(&db, BillingConfig::default());
    let err = svc
        .create_bill(
            &ctx,
            BillDraft {
                customer_id: None,
                lines: vec![BillLineDraft {
                    item_id: foreign.id,
                    quantity: 1,
                }],
                discount: 0.0,
                extra_charges: 0.0,
                payment_method: PaymentMethod::Cash,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, VendoError::NotFound { .. }));
}

#[tokio::test]
async fn attached_customer_gets_visit_and_points() {
    let (db, ctx, chai_id, _, _) = setup().await;

    let customers = SurrealCustomerRepository::new(db.clone());
    let ravi = customers
        .create(CreateCustomer {
            vendor_id: ctx.vendor_id,
            name: "Ravi".into(),
            phone: "9999999999".into(),
            email: None,
            notes: None,
        })
        .await
        .unwrap();

    let svc = billing(
        &db,
        BillingConfig {
            loyalty_earn_rate: 0.1,
            low_stock_alerts: true,
        },
    );

    let bill = svc
        .create_bill(
            &ctx,
            BillDraft {
                customer_id: Some(ravi.id),
                lines: vec![BillLineDraft {
                    item_id: chai_id,
                    quantity: 4,
                }],
                discount: 10.0,
                extra_charges: 5.0,
                payment_method: PaymentMethod::Card,
            },
        )
        .await
        .unwrap();
    assert_eq!(bill.final_amount, 95.0);

    let after = customers.get(ctx.vendor_id, ravi.id).await.unwrap();
    assert_eq!(after.visit_count, 1);
    assert_eq!(after.total_spent, 95.0);
    assert!(after.last_visit_at.is_some());

    // floor(95 * 0.1) = 9 points.
    let points = SurrealLoyaltyPointRepository::new(db);
    assert_eq!(points.balance(ctx.vendor_id, ravi.id).await.unwrap(), 9);
}

#[tokio::test]
async fn draining_stock_emits_low_stock_notification() {
    let (db, ctx, _, coffee_id, _) = setup().await;
    let svc = billing(&db, BillingConfig::default());

    // 10 in stock, threshold 3: selling 8 leaves 2.
    svc.create_bill(
        &ctx,
        BillDraft {
            customer_id: None,
            lines: vec![BillLineDraft {
                item_id: coffee_id,
                quantity: 8,
            }],
            discount: 0.0,
            extra_charges: 0.0,
            payment_method: PaymentMethod::Cash,
        },
    )
    .await
    .unwrap();

    let notifications = SurrealNotificationRepository::new(db);
    let page = notifications
        .list(ctx.vendor_id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "Low stock");
    assert!(!page.items[0].read);
}

#[tokio::test]
async fn pending_vendor_cannot_bill() {
    let (db, ctx, chai_id, _, _) = setup().await;

    let pending_ctx = TenantContext {
        status: OnboardingStatus::Pending,
        ..ctx
    };

    let svc = billing(&db, BillingConfig::default());
    let err = svc
        .create_bill(
            &pending_ctx,
            BillDraft {
                customer_id: None,
                lines: vec![BillLineDraft {
                    item_id: chai_id,
                    quantity: 1,
                }],
                discount: 0.0,
                extra_charges: 0.0,
                payment_method: PaymentMethod::Cash,
            },
        )
        .await
        .unwrap_err();

    // Gated, not a validation error.
    assert!(matches!(err, VendoError::NotApproved { .. }));
}
