//! Integration tests for the leave balance repository.

mod common;

use rstest::rstest;

use leavewise_core::leave::LeaveError;
use leavewise_db::repositories::{
    BalanceFilter, CreateBalanceInput, CreateLeaveRequestInput, LeaveBalanceRepository,
    UpdateBalanceInput,
};
use leavewise_shared::types::{LeaveBalanceId, LeaveRequestId};

use common::{assign, date, leave_repo, setup_db, TestOrg};

#[tokio::test]
async fn test_create_balance_and_duplicate_conflicts() {
    let db = setup_db().await;
    let org = TestOrg::create(&db).await;
    let annual = common::insert_leave_type(&db, org.id, "Annual Leave", 20).await;
    let repo = LeaveBalanceRepository::new(db.clone());
    let input = CreateBalanceInput {
        employee_id: org.employee.employee_id,
        leave_type_id: annual,
        year: 2024,
        total_days: 12,
        carried_over: 2,
    };

    let created = repo
        .create(&org.hr, input)
        .await
        .expect("create should succeed");
    assert_eq!(created.total_days, 12);
    assert_eq!(created.used_days, 0);
    assert_eq!(created.available_days, 12);
    assert_eq!(created.carried_over, 2);

    let err = repo
        .create(&org.hr, input)
        .await
        .expect_err("duplicate balance should fail");
    assert!(matches!(err, LeaveError::Conflict(_)));

    let err = repo
        .create(&org.manager, CreateBalanceInput { year: 2025, ..input })
        .await
        .expect_err("manager cannot create balances");
    assert!(matches!(err, LeaveError::Forbidden(_)));
}

#[rstest]
#[case::grow(Some(25), None, 25, 20, 0)]
#[case::shrink(Some(8), None, 8, 3, 0)]
#[case::below_used(Some(2), None, 2, 0, 0)]
#[case::carry_only(None, Some(4), 10, 5, 4)]
#[tokio::test]
async fn test_update_recomputes_available(
    #[case] total_days: Option<i32>,
    #[case] carried_over: Option<i32>,
    #[case] expected_total: i32,
    #[case] expected_available: i32,
    #[case] expected_carried: i32,
) {
    let db = setup_db().await;
    let org = TestOrg::create(&db).await;
    let annual = common::insert_leave_type(&db, org.id, "Annual Leave", 10).await;
    let balance = assign(&db, &org.hr, org.employee.employee_id, annual, 10).await;

    // Use five days so every update has to respect them
    let leave = leave_repo(&db);
    let created = leave
        .create(
            &org.employee,
            CreateLeaveRequestInput {
                employee_id: org.employee.employee_id,
                leave_type_id: annual,
                start_date: date(2024, 7, 1),
                end_date: date(2024, 7, 5),
                reason: None,
            },
        )
        .await
        .expect("create should succeed");
    leave
        .approve(&org.manager, LeaveRequestId::from_uuid(created.id))
        .await
        .expect("approve should succeed");

    let updated = LeaveBalanceRepository::new(db.clone())
        .update(
            &org.hr,
            LeaveBalanceId::from_uuid(balance.id),
            UpdateBalanceInput {
                total_days,
                carried_over,
            },
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.total_days, expected_total);
    assert_eq!(updated.used_days, 5);
    assert_eq!(updated.available_days, expected_available);
    assert_eq!(updated.carried_over, expected_carried);
}

#[tokio::test]
async fn test_delete_only_unused_balances() {
    let db = setup_db().await;
    let org = TestOrg::create(&db).await;
    let annual = common::insert_leave_type(&db, org.id, "Annual Leave", 20).await;
    let sick = common::insert_leave_type(&db, org.id, "Sick Leave", 10).await;
    let used = assign(&db, &org.hr, org.employee.employee_id, annual, 20).await;
    let unused = assign(&db, &org.hr, org.employee.employee_id, sick, 10).await;

    let leave = leave_repo(&db);
    let created = leave
        .create(
            &org.employee,
            CreateLeaveRequestInput {
                employee_id: org.employee.employee_id,
                leave_type_id: annual,
                start_date: date(2024, 7, 1),
                end_date: date(2024, 7, 1),
                reason: None,
            },
        )
        .await
        .expect("create should succeed");
    leave
        .approve(&org.manager, LeaveRequestId::from_uuid(created.id))
        .await
        .expect("approve should succeed");

    let repo = LeaveBalanceRepository::new(db.clone());
    let err = repo
        .delete(&org.hr, LeaveBalanceId::from_uuid(used.id))
        .await
        .expect_err("used balance cannot be deleted");
    assert!(matches!(err, LeaveError::InvalidState(ref msg) if msg.contains("partially used")));

    repo.delete(&org.hr, LeaveBalanceId::from_uuid(unused.id))
        .await
        .expect("unused balance can be deleted");
    let err = repo
        .get_by_id(&org.hr, LeaveBalanceId::from_uuid(unused.id))
        .await
        .expect_err("deleted balance is gone");
    assert!(matches!(err, LeaveError::NotFound { .. }));
}

#[tokio::test]
async fn test_list_for_employee_filters_and_orders() {
    let db = setup_db().await;
    let org = TestOrg::create(&db).await;
    let annual = common::insert_leave_type(&db, org.id, "Annual Leave", 20).await;
    let sick = common::insert_leave_type(&db, org.id, "Sick Leave", 10).await;
    let repo = LeaveBalanceRepository::new(db.clone());
    let employee_id = org.employee.employee_id;

    for (leave_type_id, year) in [(sick, 2024), (annual, 2023), (annual, 2024)] {
        repo.create(
            &org.hr,
            CreateBalanceInput {
                employee_id,
                leave_type_id,
                year,
                total_days: 10,
                carried_over: 0,
            },
        )
        .await
        .expect("create should succeed");
    }

    let all = repo
        .list_for_employee(&org.employee, employee_id, BalanceFilter::default())
        .await
        .expect("own balances are visible");
    let order: Vec<_> = all
        .iter()
        .map(|b| (b.balance.year, b.leave_type_name.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![(2024, "Annual Leave"), (2024, "Sick Leave"), (2023, "Annual Leave")]
    );

    let filtered = repo
        .list_for_employee(
            &org.manager,
            employee_id,
            BalanceFilter {
                year: Some(2024),
                leave_type_id: Some(sick),
            },
        )
        .await
        .expect("managers see their organization");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].leave_type_name, "Sick Leave");

    let colleague = org.add_employee(&db, "Sam Employee").await;
    let err = repo
        .list_for_employee(&colleague, employee_id, BalanceFilter::default())
        .await
        .expect_err("employees cannot see colleagues' balances");
    assert!(matches!(err, LeaveError::Forbidden(_)));
}

#[tokio::test]
async fn test_balances_are_scoped_to_organization() {
    let db = setup_db().await;
    let org = TestOrg::create(&db).await;
    let other = TestOrg::create(&db).await;
    let annual = common::insert_leave_type(&db, org.id, "Annual Leave", 20).await;
    let balance = assign(&db, &org.hr, org.employee.employee_id, annual, 20).await;
    let repo = LeaveBalanceRepository::new(db.clone());
    let balance_id = LeaveBalanceId::from_uuid(balance.id);

    let err = repo
        .get_by_id(&other.admin, balance_id)
        .await
        .expect_err("other organization cannot read");
    assert!(matches!(err, LeaveError::NotFound { .. }));

    let err = repo
        .update(&other.admin, balance_id, UpdateBalanceInput::default())
        .await
        .expect_err("other organization cannot update");
    assert!(matches!(err, LeaveError::NotFound { .. }));

    let err = repo
        .create(
            &other.hr,
            CreateBalanceInput {
                employee_id: org.employee.employee_id,
                leave_type_id: annual,
                year: 2025,
                total_days: 5,
                carried_over: 0,
            },
        )
        .await
        .expect_err("other organization cannot allocate");
    assert!(matches!(err, LeaveError::NotFound { .. }));
}
