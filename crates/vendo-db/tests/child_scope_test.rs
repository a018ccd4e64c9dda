//! Integration tests for child entities (loyalty points, staff
//! attendance) whose tenant scope is inherited through a parent chain.

use chrono::NaiveDate;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;
use vendo_core::error::VendoError;
use vendo_core::models::customer::CreateCustomer;
use vendo_core::models::loyalty::CreateLoyaltyPoint;
use vendo_core::models::profile::CreateProfile;
use vendo_core::models::staff::{AttendanceStatus, CreateStaff, CreateStaffAttendance};
use vendo_core::repository::{
    CustomerRepository, LoyaltyPointRepository, Pagination, ProfileRepository,
    StaffAttendanceRepository, StaffRepository,
};
use vendo_db::repository::{
    SurrealCustomerRepository, SurrealLoyaltyPointRepository, SurrealProfileRepository,
    SurrealStaffAttendanceRepository, SurrealStaffRepository,
};

/// Helper: two vendors, one customer and one staff member under vendor A.
async fn setup() -> (
    Surreal<surrealdb::engine::local::Db>,
    Uuid, // vendor_a
    Uuid, // vendor_b
    Uuid, // customer of vendor_a
    Uuid, // staff of vendor_a
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

    let customers = SurrealCustomerRepository::new(db.clone());
    let customer = customers
        .create(CreateCustomer {
            vendor_id: vendor_a.id,
            name: "Ravi".into(),
            phone: "9999999999".into(),
            email: None,
            notes: None,
        })
        .await
        .unwrap();

    let staff = SurrealStaffRepository::new(db.clone());
    let cook = staff
        .create(CreateStaff {
            vendor_id: vendor_a.id,
            name: "Manu".into(),
            role: "cook".into(),
            phone: "6000000001".into(),
        })
        .await
        .unwrap();

    (db, vendor_a.id, vendor_b.id, customer.id, cook.id)
}

#[tokio::test]
async fn points_accrue_through_the_chain() {
    let (db, vendor_a, _, customer_id, _) = setup().await;
    let points = SurrealLoyaltyPointRepository::new(db);

    points
        .append(
            vendor_a,
            CreateLoyaltyPoint {
                customer_id,
                points: 40,
                reason: "bill".into(),
            },
        )
        .await
        .unwrap();
    points
        .append(
            vendor_a,
            CreateLoyaltyPoint {
                customer_id,
                points: -15,
                reason: "redeemed: free samosa".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(points.balance(vendor_a, customer_id).await.unwrap(), 25);

    let history = points
        .list_for_customer(vendor_a, customer_id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(history.total, 2);
}

#[tokio::test]
async fn foreign_customer_chain_is_not_found() {
    let (db, _, vendor_b, customer_id, _) = setup().await;
    let points = SurrealLoyaltyPointRepository::new(db);

    // Vendor B holds the exact customer id of vendor A's customer.
    let err = points
        .append(
            vendor_b,
            CreateLoyaltyPoint {
                customer_id,
                points: 100,
                reason: "bill".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(
        matches!(err, VendoError::NotFound { .. }),
        "chain miss must look like an absent customer"
    );

    let err = points.balance(vendor_b, customer_id).await.unwrap_err();
    assert!(matches!(err, VendoError::NotFound { .. }));
}

#[tokio::test]
async fn empty_balance_is_zero() {
    let (db, vendor_a, _, customer_id, _) = setup().await;
    let points = SurrealLoyaltyPointRepository::new(db);

    assert_eq!(points.balance(vendor_a, customer_id).await.unwrap(), 0);
}

#[tokio::test]
async fn attendance_records_through_the_chain() {
    let (db, vendor_a, _, _, staff_id) = setup().await;
    let attendance = SurrealStaffAttendanceRepository::new(db);

    let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let entry = attendance
        .record(
            vendor_a,
            CreateStaffAttendance {
                staff_id,
                day,
                status: AttendanceStatus::Present,
                note: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(entry.staff_id, staff_id);
    assert_eq!(entry.day, day);
    assert_eq!(entry.status, AttendanceStatus::Present);

    let listed = attendance
        .list_for_staff(
            vendor_a,
            staff_id,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn duplicate_attendance_day_rejected() {
    let (db, vendor_a, _, _, staff_id) = setup().await;
    let attendance = SurrealStaffAttendanceRepository::new(db);

    let day = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
    attendance
        .record(
            vendor_a,
            CreateStaffAttendance {
                staff_id,
                day,
                status: AttendanceStatus::Present,
                note: None,
            },
        )
        .await
        .unwrap();

    let result = attendance
        .record(
            vendor_a,
            CreateStaffAttendance {
                staff_id,
                day,
                status: AttendanceStatus::Absent,
                note: None,
            },
        )
        .await;
    assert!(result.is_err(), "one attendance entry per staff per day");
}

#[tokio::test]
async fn foreign_staff_chain_is_not_found() {
    let (db, _, vendor_b, _, staff_id) = setup().await;
    let attendance = SurrealStaffAttendanceRepository::new(db);

    let err = attendance
        .record(
            vendor_b,
            CreateStaffAttendance {
                staff_id,
                day: NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
                status: AttendanceStatus::Present,
                note: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, VendoError::NotFound { .. }));
}
