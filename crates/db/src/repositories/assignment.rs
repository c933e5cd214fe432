//! Leave type assignment.
//!
//! Assigning a leave type to an employee for a year upserts the balance on
//! (employee, leave type, year). Re-running an assignment updates the same
//! row and never touches `used_days`.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};

use leavewise_core::auth::{Caller, Role};
use leavewise_core::leave::{
    AssignmentSyncResult, BalanceService, BulkAssignmentResult, LeaveError,
};
use leavewise_shared::types::{EmployeeId, LeaveBalanceId, LeaveTypeId, OrganizationId};

use crate::entities::{employees, leave_balances, leave_types};

use super::{balance_days, db_err, find_active_employee, find_leave_type};

/// What to assign: a leave type, a year and an allocation.
#[derive(Debug, Clone, Copy)]
pub struct AssignLeaveTypeInput {
    /// Leave type to assign.
    pub leave_type_id: LeaveTypeId,
    /// Allocation year.
    pub year: i32,
    /// Days to allocate; the leave type's `max_days_per_year` when `None`.
    pub total_days: Option<i32>,
    /// Days carried over from the previous year.
    pub carried_over: i32,
}

/// Repository for single, bulk and set-replacing assignments.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    db: DatabaseConnection,
}

impl AssignmentRepository {
    /// Creates a new assignment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assigns a leave type to one employee.
    ///
    /// Creates the balance if absent, otherwise updates its allocation and
    /// recomputes `available_days` against the existing `used_days`.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is HR_ADMIN or above
    /// - `NotFound` if the employee is missing, inactive or in another
    ///   organization, or the leave type is not in the organization
    /// - `Validation` for negative day counts
    pub async fn assign_leave_type(
        &self,
        caller: &Caller,
        employee_id: EmployeeId,
        input: AssignLeaveTypeInput,
    ) -> Result<leave_balances::Model, LeaveError> {
        caller.require(Role::HrAdmin, "assign leave types")?;
        let leave_type = find_leave_type(&self.db, caller.organization_id, input.leave_type_id).await?;
        self.assign_one(caller.organization_id, employee_id, &leave_type, input)
            .await
    }

    /// Assigns a leave type to many employees, one at a time.
    ///
    /// Each employee is handled in its own transaction. A failure is recorded
    /// and the batch moves on; the result reports successes, failures and
    /// counts.
    ///
    /// # Errors
    ///
    /// Only whole-batch problems fail the call: `Forbidden` for the caller's
    /// role and `NotFound` for the leave type.
    pub async fn bulk_assign_leave_type(
        &self,
        caller: &Caller,
        employee_ids: Vec<EmployeeId>,
        input: AssignLeaveTypeInput,
    ) -> Result<BulkAssignmentResult, LeaveError> {
        caller.require(Role::HrAdmin, "assign leave types")?;
        let leave_type = find_leave_type(&self.db, caller.organization_id, input.leave_type_id).await?;

        let mut result = BulkAssignmentResult::with_capacity(employee_ids.len());
        for employee_id in employee_ids {
            match self
                .assign_one(caller.organization_id, employee_id, &leave_type, input)
                .await
            {
                Ok(balance) => {
                    let name = self
                        .employee_name(caller.organization_id, employee_id)
                        .await
                        .unwrap_or_default();
                    result.record_success(employee_id, name, LeaveBalanceId::from_uuid(balance.id));
                }
                Err(err) => {
                    warn!(
                        employee_id = %employee_id,
                        leave_type_id = %input.leave_type_id,
                        error = %err,
                        "leave type assignment failed for employee"
                    );
                    let name = self.employee_name(caller.organization_id, employee_id).await;
                    result.record_failure(employee_id, name, &err);
                }
            }
        }

        info!(
            leave_type_id = %input.leave_type_id,
            year = input.year,
            total = result.summary.total,
            successful = result.summary.successful,
            failed = result.summary.failed,
            "bulk leave type assignment finished"
        );
        Ok(result)
    }

    /// Makes `employee_ids` the set of employees holding this leave type for
    /// the year.
    ///
    /// Listed employees are upserted as in `bulk_assign_leave_type`. Balances
    /// of other employees are deleted when nothing has been used from them,
    /// and kept otherwise; both lists are returned.
    ///
    /// # Errors
    ///
    /// As for `bulk_assign_leave_type`, plus database failures while removing.
    pub async fn sync_leave_type_assignments(
        &self,
        caller: &Caller,
        employee_ids: Vec<EmployeeId>,
        input: AssignLeaveTypeInput,
    ) -> Result<AssignmentSyncResult, LeaveError> {
        let desired: HashSet<_> = employee_ids.iter().map(|id| id.into_inner()).collect();
        let assignment = self
            .bulk_assign_leave_type(caller, employee_ids, input)
            .await?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let stale = leave_balances::Entity::find()
            .filter(leave_balances::Column::LeaveTypeId.eq(input.leave_type_id.into_inner()))
            .filter(leave_balances::Column::Year.eq(input.year))
            .filter(leave_balances::Column::EmployeeId.is_not_in(desired))
            .lock_exclusive()
            .all(&txn)
            .await
            .map_err(db_err)?;

        let mut removed = Vec::new();
        let mut retained = Vec::new();
        for balance in stale {
            let employee_id = EmployeeId::from_uuid(balance.employee_id);
            if balance.used_days == 0 {
                balance.delete(&txn).await.map_err(db_err)?;
                removed.push(employee_id);
            } else {
                retained.push(employee_id);
            }
        }
        txn.commit().await.map_err(db_err)?;

        info!(
            leave_type_id = %input.leave_type_id,
            year = input.year,
            removed = removed.len(),
            retained = retained.len(),
            "leave type assignments synced"
        );
        Ok(AssignmentSyncResult {
            assignment,
            removed,
            retained,
        })
    }

    /// Upserts one employee's balance in its own transaction.
    async fn assign_one(
        &self,
        organization_id: OrganizationId,
        employee_id: EmployeeId,
        leave_type: &leave_types::Model,
        input: AssignLeaveTypeInput,
    ) -> Result<leave_balances::Model, LeaveError> {
        let total_days = input.total_days.unwrap_or(leave_type.max_days_per_year);
        BalanceService::validate_allocation(total_days, input.carried_over)?;
        find_active_employee(&self.db, organization_id, employee_id).await?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let existing = leave_balances::Entity::find()
            .filter(leave_balances::Column::EmployeeId.eq(employee_id.into_inner()))
            .filter(leave_balances::Column::LeaveTypeId.eq(leave_type.id))
            .filter(leave_balances::Column::Year.eq(input.year))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?;

        let now = Utc::now().into();
        let balance = if let Some(current) = existing {
            let days = BalanceService::retotal(
                balance_days(&current),
                Some(total_days),
                Some(input.carried_over),
            )?;
            let mut active: leave_balances::ActiveModel = current.into();
            active.total_days = Set(days.total_days);
            active.available_days = Set(days.available_days);
            active.carried_over = Set(days.carried_over);
            active.updated_at = Set(now);
            active.update(&txn).await.map_err(db_err)?
        } else {
            let days = BalanceService::opening(total_days, input.carried_over)?;
            leave_balances::ActiveModel {
                id: Set(LeaveBalanceId::new().into_inner()),
                employee_id: Set(employee_id.into_inner()),
                leave_type_id: Set(leave_type.id),
                year: Set(input.year),
                total_days: Set(days.total_days),
                used_days: Set(days.used_days),
                available_days: Set(days.available_days),
                carried_over: Set(days.carried_over),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(db_err)?
        };
        txn.commit().await.map_err(db_err)?;

        info!(
            employee_id = %employee_id,
            leave_type_id = %leave_type.id,
            year = input.year,
            total_days = balance.total_days,
            available_days = balance.available_days,
            "leave type assigned"
        );
        Ok(balance)
    }

    /// Name of an employee of the organization, if one exists.
    ///
    /// A failed lookup is logged and reported as no name; it only decorates
    /// a batch result.
    async fn employee_name(
        &self,
        organization_id: OrganizationId,
        employee_id: EmployeeId,
    ) -> Option<String> {
        employees::Entity::find_by_id(employee_id.into_inner())
            .filter(employees::Column::OrganizationId.eq(organization_id.into_inner()))
            .one(&self.db)
            .await
            .unwrap_or_else(|err| {
                warn!(
                    employee_id = %employee_id,
                    error = %err,
                    "employee name lookup failed"
                );
                None
            })
            .map(|employee| employee.full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_employee_name_lookup_failure_yields_none() {
        let repo = AssignmentRepository::new(DatabaseConnection::Disconnected);
        let name = repo
            .employee_name(OrganizationId::new(), EmployeeId::new())
            .await;
        assert_eq!(name, None);
    }
}
