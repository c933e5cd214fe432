//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every operation takes the caller explicitly and checks its role and
//! organization before touching any row.

pub mod assignment;
pub mod employee;
pub mod leave_balance;
pub mod leave_request;
pub mod leave_type;

pub use assignment::{AssignLeaveTypeInput, AssignmentRepository};
pub use employee::{CreateEmployeeInput, EmployeeRepository};
pub use leave_balance::{
    BalanceFilter, BalanceWithLeaveType, CreateBalanceInput, LeaveBalanceRepository,
    UpdateBalanceInput,
};
pub use leave_request::{
    BalanceCheckInput, CreateLeaveRequestInput, LeaveRequestFilter, LeaveRequestRepository,
    PendingLeaveRequest, UpdateLeaveRequestInput,
};
pub use leave_type::{CreateLeaveTypeInput, LeaveTypeRepository, UpdateLeaveTypeInput};

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, SqlErr};
use tracing::{error, warn};

use leavewise_core::auth::Role;
use leavewise_core::leave::{BalanceDays, BalanceSnapshot, LeaveError, LeaveStatus};
use leavewise_shared::types::{EmployeeId, LeaveBalanceId, LeaveTypeId, OrganizationId};

use crate::entities::{
    employees, leave_balances, leave_types,
    sea_orm_active_enums::{EmployeeRole, LeaveStatus as DbLeaveStatus},
};

/// Name of the Postgres exclusion constraint on overlapping requests.
const OVERLAP_CONSTRAINT: &str = "excl_leave_requests_overlap";

/// Wraps a database error, logging it.
///
/// Unique violations surface as `Conflict`. The overlap exclusion constraint
/// surfaces as `OverlappingRequest`; the racing rows are not re-read, so the
/// list is empty.
pub(crate) fn db_err(err: DbErr) -> LeaveError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return LeaveError::Conflict(format!("record already exists: {detail}"));
    }
    if err.to_string().contains(OVERLAP_CONSTRAINT) {
        warn!(error = %err, "overlap constraint rejected a leave request");
        return LeaveError::OverlappingRequest {
            overlapping: Vec::new(),
        };
    }

    error!(error = %err, "database operation failed");
    LeaveError::Database(err.to_string())
}

/// Converts database `LeaveStatus` to core `LeaveStatus`.
pub(crate) const fn db_status_to_core(status: &DbLeaveStatus) -> LeaveStatus {
    match status {
        DbLeaveStatus::Pending => LeaveStatus::Pending,
        DbLeaveStatus::Approved => LeaveStatus::Approved,
        DbLeaveStatus::Rejected => LeaveStatus::Rejected,
        DbLeaveStatus::Cancelled => LeaveStatus::Cancelled,
    }
}

/// Converts core `LeaveStatus` to database `LeaveStatus`.
pub(crate) const fn core_status_to_db(status: LeaveStatus) -> DbLeaveStatus {
    match status {
        LeaveStatus::Pending => DbLeaveStatus::Pending,
        LeaveStatus::Approved => DbLeaveStatus::Approved,
        LeaveStatus::Rejected => DbLeaveStatus::Rejected,
        LeaveStatus::Cancelled => DbLeaveStatus::Cancelled,
    }
}

/// Converts database `EmployeeRole` to core `Role`.
pub const fn db_role_to_core(role: &EmployeeRole) -> Role {
    match role {
        EmployeeRole::Employee => Role::Employee,
        EmployeeRole::Manager => Role::Manager,
        EmployeeRole::HrAdmin => Role::HrAdmin,
        EmployeeRole::SuperAdmin => Role::SuperAdmin,
    }
}

/// Converts core `Role` to database `EmployeeRole`.
pub(crate) const fn core_role_to_db(role: Role) -> EmployeeRole {
    match role {
        Role::Employee => EmployeeRole::Employee,
        Role::Manager => EmployeeRole::Manager,
        Role::HrAdmin => EmployeeRole::HrAdmin,
        Role::SuperAdmin => EmployeeRole::SuperAdmin,
    }
}

/// Day counters of a balance row.
pub(crate) const fn balance_days(balance: &leave_balances::Model) -> BalanceDays {
    BalanceDays {
        total_days: balance.total_days,
        used_days: balance.used_days,
        available_days: balance.available_days,
        carried_over: balance.carried_over,
    }
}

/// Snapshot of a balance row for balance checks.
pub(crate) const fn balance_snapshot(balance: &leave_balances::Model) -> BalanceSnapshot {
    BalanceSnapshot {
        id: LeaveBalanceId::from_uuid(balance.id),
        year: balance.year,
        total_days: balance.total_days,
        used_days: balance.used_days,
        available_days: balance.available_days,
        carried_over: balance.carried_over,
    }
}

/// Loads an employee of the organization, active or not.
pub(crate) async fn find_employee<C: ConnectionTrait>(
    conn: &C,
    organization_id: OrganizationId,
    employee_id: EmployeeId,
) -> Result<employees::Model, LeaveError> {
    employees::Entity::find_by_id(employee_id.into_inner())
        .filter(employees::Column::OrganizationId.eq(organization_id.into_inner()))
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| LeaveError::not_found("Employee", employee_id))
}

/// Loads an active employee of the organization.
///
/// A deactivated employee is reported as not found.
pub(crate) async fn find_active_employee<C: ConnectionTrait>(
    conn: &C,
    organization_id: OrganizationId,
    employee_id: EmployeeId,
) -> Result<employees::Model, LeaveError> {
    let employee = find_employee(conn, organization_id, employee_id).await?;
    if employee.is_active {
        Ok(employee)
    } else {
        Err(LeaveError::not_found("Employee", employee_id))
    }
}

/// Loads a leave type of the organization.
pub(crate) async fn find_leave_type<C: ConnectionTrait>(
    conn: &C,
    organization_id: OrganizationId,
    leave_type_id: LeaveTypeId,
) -> Result<leave_types::Model, LeaveError> {
    leave_types::Entity::find_by_id(leave_type_id.into_inner())
        .filter(leave_types::Column::OrganizationId.eq(organization_id.into_inner()))
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| LeaveError::not_found("LeaveType", leave_type_id))
}

/// Finds the balance row for an employee, leave type and year.
pub(crate) async fn find_balance<C: ConnectionTrait>(
    conn: &C,
    employee_id: EmployeeId,
    leave_type_id: LeaveTypeId,
    year: i32,
) -> Result<Option<leave_balances::Model>, LeaveError> {
    leave_balances::Entity::find()
        .filter(leave_balances::Column::EmployeeId.eq(employee_id.into_inner()))
        .filter(leave_balances::Column::LeaveTypeId.eq(leave_type_id.into_inner()))
        .filter(leave_balances::Column::Year.eq(year))
        .one(conn)
        .await
        .map_err(db_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion_round_trip() {
        for status in [
            LeaveStatus::Pending,
            LeaveStatus::Approved,
            LeaveStatus::Rejected,
            LeaveStatus::Cancelled,
        ] {
            assert_eq!(db_status_to_core(&core_status_to_db(status)), status);
        }
    }

    #[test]
    fn test_role_conversion_round_trip() {
        for role in [Role::Employee, Role::Manager, Role::HrAdmin, Role::SuperAdmin] {
            assert_eq!(db_role_to_core(&core_role_to_db(role)), role);
        }
    }

    #[test]
    fn test_db_err_wraps_as_database() {
        let err = db_err(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, LeaveError::Database(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_db_err_maps_overlap_constraint() {
        let err = db_err(DbErr::Custom(format!(
            "conflicting key value violates exclusion constraint \"{OVERLAP_CONSTRAINT}\""
        )));
        assert!(matches!(
            err,
            LeaveError::OverlappingRequest { ref overlapping } if overlapping.is_empty()
        ));
        assert_eq!(err.error_code(), "OVERLAPPING_REQUEST");
    }
}
