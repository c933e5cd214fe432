//! Development data seeder for Leavewise.
//!
//! Creates a demo organization with a super admin, a small team, two leave
//! types assigned for the current year and one approved request.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Datelike, Days, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use leavewise_core::auth::{Caller, Role};
use leavewise_db::entities::{employees, organizations, sea_orm_active_enums::EmployeeRole};
use leavewise_db::repositories::{
    AssignLeaveTypeInput, CreateEmployeeInput, CreateLeaveRequestInput, CreateLeaveTypeInput,
};
use leavewise_db::{
    AssignmentRepository, EmployeeRepository, LeaveRequestRepository, LeaveTypeRepository,
};
use leavewise_shared::{AppConfig, LeaveSettings};
use leavewise_shared::types::{EmployeeId, LeaveRequestId, LeaveTypeId, OrganizationId};

/// Demo organization id, stable across runs.
const DEMO_ORG_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo super admin id, stable across runs.
const DEMO_ADMIN_ID: &str = "00000000-0000-0000-0000-000000000002";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = leavewise_db::connect_with(&config.database).await?;
    info!("Connected to database");

    let organization_id = OrganizationId::from_uuid(Uuid::parse_str(DEMO_ORG_ID)?);
    let admin_id = EmployeeId::from_uuid(Uuid::parse_str(DEMO_ADMIN_ID)?);

    if organizations::Entity::find_by_id(organization_id.into_inner())
        .one(&db)
        .await?
        .is_some()
    {
        info!(organization_id = %organization_id, "demo organization already seeded");
        return Ok(());
    }

    seed_organization(&db, organization_id, admin_id).await?;
    let admin = Caller::new(admin_id, organization_id, Role::SuperAdmin);

    let team = seed_team(&db, &admin).await?;
    let leave_types = seed_leave_types(&db, &admin).await?;
    seed_assignments(&db, &admin, &team, &leave_types).await?;
    if let Some(&annual) = leave_types.first() {
        seed_sample_request(&db, config.leave, &admin, &team, annual).await?;
    }

    info!("Seeding complete");
    Ok(())
}

/// Inserts the organization and its first super admin directly; every
/// later write goes through the repositories as that admin.
async fn seed_organization(
    db: &DatabaseConnection,
    organization_id: OrganizationId,
    admin_id: EmployeeId,
) -> anyhow::Result<()> {
    let now = Utc::now().into();
    organizations::ActiveModel {
        id: Set(organization_id.into_inner()),
        name: Set("Leavewise Demo".to_string()),
        created_at: Set(now),
    }
    .insert(db)
    .await?;

    employees::ActiveModel {
        id: Set(admin_id.into_inner()),
        organization_id: Set(organization_id.into_inner()),
        full_name: Set("Ada Admin".to_string()),
        email: Set("admin@leavewise.test".to_string()),
        role: Set(EmployeeRole::SuperAdmin),
        is_active: Set(true),
        user_id: Set(None),
        manager_id: Set(None),
        department_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    info!(organization_id = %organization_id, "seeded demo organization");
    Ok(())
}

async fn seed_team(db: &DatabaseConnection, admin: &Caller) -> anyhow::Result<Vec<EmployeeId>> {
    let repo = EmployeeRepository::new(db.clone());
    let people = [
        ("Hana HR", "hana@leavewise.test", Role::HrAdmin, None),
        ("Max Manager", "max@leavewise.test", Role::Manager, None),
        ("Eve Employee", "eve@leavewise.test", Role::Employee, Some(1)),
        ("Sam Employee", "sam@leavewise.test", Role::Employee, Some(1)),
    ];

    let mut ids: Vec<EmployeeId> = Vec::with_capacity(people.len());
    for (full_name, email, role, manager) in people {
        let manager_id = manager.and_then(|index: usize| ids.get(index).copied());
        let employee = repo
            .create(
                admin,
                CreateEmployeeInput {
                    full_name: full_name.to_string(),
                    email: email.to_string(),
                    role,
                    user_id: None,
                    manager_id,
                    department_id: None,
                },
            )
            .await?;
        ids.push(EmployeeId::from_uuid(employee.id));
    }

    info!(count = ids.len(), "seeded employees");
    Ok(ids)
}

async fn seed_leave_types(
    db: &DatabaseConnection,
    admin: &Caller,
) -> anyhow::Result<Vec<LeaveTypeId>> {
    let repo = LeaveTypeRepository::new(db.clone());
    let types = [
        ("Annual Leave", "Paid yearly vacation", 20),
        ("Sick Leave", "Illness with or without a note", 10),
    ];

    let mut ids = Vec::with_capacity(types.len());
    for (name, description, max_days_per_year) in types {
        let leave_type = repo
            .create(
                admin,
                CreateLeaveTypeInput {
                    name: name.to_string(),
                    description: Some(description.to_string()),
                    max_days_per_year,
                },
            )
            .await?;
        ids.push(LeaveTypeId::from_uuid(leave_type.id));
    }

    info!(count = ids.len(), "seeded leave types");
    Ok(ids)
}

async fn seed_assignments(
    db: &DatabaseConnection,
    admin: &Caller,
    team: &[EmployeeId],
    leave_types: &[LeaveTypeId],
) -> anyhow::Result<()> {
    let repo = AssignmentRepository::new(db.clone());
    let year = Utc::now().year();

    let mut everyone = vec![admin.employee_id];
    everyone.extend_from_slice(team);

    for &leave_type_id in leave_types {
        let result = repo
            .bulk_assign_leave_type(
                admin,
                everyone.clone(),
                AssignLeaveTypeInput {
                    leave_type_id,
                    year,
                    total_days: None,
                    carried_over: 0,
                },
            )
            .await?;
        info!(
            leave_type_id = %leave_type_id,
            successful = result.summary.successful,
            failed = result.summary.failed,
            "seeded balances"
        );
    }
    Ok(())
}

/// Request repository honouring the configured lifecycle policy.
fn request_repository(db: &DatabaseConnection, settings: LeaveSettings) -> LeaveRequestRepository {
    LeaveRequestRepository::new(db.clone()).with_settings(settings)
}

/// Books three days for the first regular employee next week and has the
/// manager approve them.
async fn seed_sample_request(
    db: &DatabaseConnection,
    settings: LeaveSettings,
    admin: &Caller,
    team: &[EmployeeId],
    leave_type_id: LeaveTypeId,
) -> anyhow::Result<()> {
    let (Some(&manager_id), Some(&employee_id)) = (team.get(1), team.get(2)) else {
        return Ok(());
    };

    let today = Utc::now().date_naive();
    let days_to_monday = u64::from(7 - today.weekday().num_days_from_monday());
    let start_date = today
        .checked_add_days(Days::new(days_to_monday))
        .context("date out of range")?;
    let end_date = start_date
        .checked_add_days(Days::new(2))
        .context("date out of range")?;
    if start_date.year() != today.year() {
        info!("skipping sample request across the year boundary");
        return Ok(());
    }

    let repo = request_repository(db, settings);
    let employee = Caller::new(employee_id, admin.organization_id, Role::Employee);
    let request = repo
        .create(
            &employee,
            CreateLeaveRequestInput {
                employee_id,
                leave_type_id,
                start_date,
                end_date,
                reason: Some("Family trip".to_string()),
            },
        )
        .await?;

    let manager = Caller::new(manager_id, admin.organization_id, Role::Manager);
    repo.approve(&manager, LeaveRequestId::from_uuid(request.id))
        .await?;

    info!(request_id = %request.id, "seeded approved leave request");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_repository_uses_configured_settings() {
        let settings = LeaveSettings {
            approve_without_balance: false,
            restore_balance_on_cancel: false,
        };
        let repo = request_repository(&DatabaseConnection::Disconnected, settings);
        assert_eq!(repo.settings(), settings);
    }
}
