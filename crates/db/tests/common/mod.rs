//! Shared fixtures for repository integration tests.
//!
//! Each test gets a fresh in-memory SQLite database whose tables are built
//! from the `SeaORM` entities. The pool holds a single connection, so the
//! database lives as long as the test and transactions serialize.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::sea_query::Index;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    Schema, Set,
};
use uuid::Uuid;

use leavewise_core::auth::{Caller, Role};
use leavewise_core::calendar::{Clock, FixedClock};
use leavewise_db::entities::{
    employees, leave_balances, leave_comments, leave_policies, leave_requests, leave_types,
    organizations, sea_orm_active_enums::EmployeeRole,
};
use leavewise_db::repositories::{AssignLeaveTypeInput, AssignmentRepository};
use leavewise_db::LeaveRequestRepository;
use leavewise_shared::types::{EmployeeId, LeaveTypeId, OrganizationId};
use leavewise_shared::LeaveSettings;

/// Monday 3 June 2024; "today" for every test.
pub fn today() -> NaiveDate {
    date(2024, 6, 3)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(today()))
}

/// Opens an in-memory database with the leave schema.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");

    let schema = Schema::new(db.get_database_backend());
    let backend = db.get_database_backend();

    create_table(&db, &schema, organizations::Entity).await;
    create_table(&db, &schema, employees::Entity).await;
    create_table(&db, &schema, leave_types::Entity).await;
    create_table(&db, &schema, leave_policies::Entity).await;
    create_table(&db, &schema, leave_balances::Entity).await;
    create_table(&db, &schema, leave_requests::Entity).await;
    create_table(&db, &schema, leave_comments::Entity).await;

    let unique_indexes = [
        Index::create()
            .name("uq_leave_balances_employee_type_year")
            .table(leave_balances::Entity)
            .col(leave_balances::Column::EmployeeId)
            .col(leave_balances::Column::LeaveTypeId)
            .col(leave_balances::Column::Year)
            .unique()
            .to_owned(),
        Index::create()
            .name("uq_leave_types_org_name")
            .table(leave_types::Entity)
            .col(leave_types::Column::OrganizationId)
            .col(leave_types::Column::Name)
            .unique()
            .to_owned(),
        Index::create()
            .name("uq_employees_org_email")
            .table(employees::Entity)
            .col(employees::Column::OrganizationId)
            .col(employees::Column::Email)
            .unique()
            .to_owned(),
    ];
    for index in &unique_indexes {
        db.execute(backend.build(index))
            .await
            .expect("Failed to create index");
    }

    db
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, schema: &Schema, entity: E) {
    let backend = db.get_database_backend();
    db.execute(backend.build(&schema.create_table_from_entity(entity)))
        .await
        .expect("Failed to create table");
}

/// An organization with one employee per role.
pub struct TestOrg {
    pub id: OrganizationId,
    pub admin: Caller,
    pub hr: Caller,
    pub manager: Caller,
    pub employee: Caller,
}

impl TestOrg {
    pub async fn create(db: &DatabaseConnection) -> Self {
        let id = OrganizationId::new();
        organizations::ActiveModel {
            id: Set(id.into_inner()),
            name: Set(format!("Org {id}")),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
        .expect("Failed to create organization");

        let admin = insert_employee(db, id, "Ada Admin", Role::SuperAdmin).await;
        let hr = insert_employee(db, id, "Hana HR", Role::HrAdmin).await;
        let manager = insert_employee(db, id, "Max Manager", Role::Manager).await;
        let employee = insert_employee(db, id, "Eve Employee", Role::Employee).await;

        Self {
            id,
            admin,
            hr,
            manager,
            employee,
        }
    }

    /// Adds another regular employee.
    pub async fn add_employee(&self, db: &DatabaseConnection, name: &str) -> Caller {
        insert_employee(db, self.id, name, Role::Employee).await
    }
}

pub async fn insert_employee(
    db: &DatabaseConnection,
    organization_id: OrganizationId,
    full_name: &str,
    role: Role,
) -> Caller {
    let id = EmployeeId::new();
    let now = Utc::now();
    employees::ActiveModel {
        id: Set(id.into_inner()),
        organization_id: Set(organization_id.into_inner()),
        full_name: Set(full_name.to_string()),
        email: Set(format!("{}@example.com", Uuid::new_v4())),
        role: Set(db_role(role)),
        is_active: Set(true),
        user_id: Set(None),
        manager_id: Set(None),
        department_id: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await
    .expect("Failed to create employee");

    Caller::new(id, organization_id, role)
}

const fn db_role(role: Role) -> EmployeeRole {
    match role {
        Role::Employee => EmployeeRole::Employee,
        Role::Manager => EmployeeRole::Manager,
        Role::HrAdmin => EmployeeRole::HrAdmin,
        Role::SuperAdmin => EmployeeRole::SuperAdmin,
    }
}

pub async fn insert_leave_type(
    db: &DatabaseConnection,
    organization_id: OrganizationId,
    name: &str,
    max_days_per_year: i32,
) -> LeaveTypeId {
    let id = LeaveTypeId::new();
    let now = Utc::now();
    leave_types::ActiveModel {
        id: Set(id.into_inner()),
        organization_id: Set(organization_id.into_inner()),
        name: Set(name.to_string()),
        description: Set(None),
        max_days_per_year: Set(max_days_per_year),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await
    .expect("Failed to create leave type");
    id
}

/// Gives `employee_id` a balance of `total_days` for the test year.
pub async fn assign(
    db: &DatabaseConnection,
    hr: &Caller,
    employee_id: EmployeeId,
    leave_type_id: LeaveTypeId,
    total_days: i32,
) -> leave_balances::Model {
    AssignmentRepository::new(db.clone())
        .assign_leave_type(
            hr,
            employee_id,
            AssignLeaveTypeInput {
                leave_type_id,
                year: today().year(),
                total_days: Some(total_days),
                carried_over: 0,
            },
        )
        .await
        .expect("Failed to assign leave type")
}

pub async fn balance(db: &DatabaseConnection, balance_id: Uuid) -> leave_balances::Model {
    leave_balances::Entity::find_by_id(balance_id)
        .one(db)
        .await
        .expect("Failed to load balance")
        .expect("balance exists")
}

pub fn leave_repo(db: &DatabaseConnection) -> LeaveRequestRepository {
    LeaveRequestRepository::new(db.clone()).with_clock(clock())
}

pub fn leave_repo_with(db: &DatabaseConnection, settings: LeaveSettings) -> LeaveRequestRepository {
    leave_repo(db).with_settings(settings)
}
