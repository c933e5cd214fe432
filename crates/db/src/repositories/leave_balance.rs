//! Leave balance repository.
//!
//! Balances are scoped through their owning employee's organization. Every
//! write recomputes `available_days` through `BalanceService` instead of
//! trusting caller input.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;

use leavewise_core::auth::{Caller, Role};
use leavewise_core::leave::{BalanceService, LeaveError};
use leavewise_shared::types::{EmployeeId, LeaveBalanceId, LeaveTypeId, OrganizationId};

use crate::entities::{employees, leave_balances, leave_types};

use super::{balance_days, db_err, find_employee, find_leave_type};

/// Filters for listing an employee's balances.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceFilter {
    /// Only this year.
    pub year: Option<i32>,
    /// Only this leave type.
    pub leave_type_id: Option<LeaveTypeId>,
}

/// A balance together with the name of its leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceWithLeaveType {
    /// The balance row.
    pub balance: leave_balances::Model,
    /// Name of the leave type.
    pub leave_type_name: String,
}

/// Input for creating a balance.
#[derive(Debug, Clone, Copy)]
pub struct CreateBalanceInput {
    /// Owning employee.
    pub employee_id: EmployeeId,
    /// Leave type.
    pub leave_type_id: LeaveTypeId,
    /// Allocation year.
    pub year: i32,
    /// Days allocated.
    pub total_days: i32,
    /// Days carried over from the previous year.
    pub carried_over: i32,
}

/// Input for editing a balance. `None` leaves a field unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateBalanceInput {
    /// New allocation.
    pub total_days: Option<i32>,
    /// New carried-over days.
    pub carried_over: Option<i32>,
}

/// Leave balance repository.
#[derive(Debug, Clone)]
pub struct LeaveBalanceRepository {
    db: DatabaseConnection,
}

impl LeaveBalanceRepository {
    /// Creates a new leave balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists an employee's balances, newest year first, then by leave type name.
    ///
    /// Employees see their own balances; managers and above see anyone's in
    /// their organization.
    ///
    /// # Errors
    ///
    /// - `Forbidden` for an employee looking at someone else
    /// - `NotFound` if the employee is not in the organization
    pub async fn list_for_employee(
        &self,
        caller: &Caller,
        employee_id: EmployeeId,
        filter: BalanceFilter,
    ) -> Result<Vec<BalanceWithLeaveType>, LeaveError> {
        if caller.employee_id != employee_id {
            caller.require(Role::Manager, "view another employee's balances")?;
        }
        find_employee(&self.db, caller.organization_id, employee_id).await?;

        let mut query = leave_balances::Entity::find()
            .filter(leave_balances::Column::EmployeeId.eq(employee_id.into_inner()));
        if let Some(year) = filter.year {
            query = query.filter(leave_balances::Column::Year.eq(year));
        }
        if let Some(leave_type_id) = filter.leave_type_id {
            query = query.filter(leave_balances::Column::LeaveTypeId.eq(leave_type_id.into_inner()));
        }

        let rows = query
            .find_also_related(leave_types::Entity)
            .order_by_desc(leave_balances::Column::Year)
            .order_by_asc(leave_types::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|(balance, leave_type)| BalanceWithLeaveType {
                balance,
                leave_type_name: leave_type.map(|t| t.name).unwrap_or_default(),
            })
            .collect())
    }

    /// Gets a balance whose employee belongs to the caller's organization.
    ///
    /// # Errors
    ///
    /// `NotFound` if the balance does not exist or belongs to another
    /// organization.
    pub async fn get_by_id(
        &self,
        caller: &Caller,
        balance_id: LeaveBalanceId,
    ) -> Result<leave_balances::Model, LeaveError> {
        let balance = self
            .find_scoped(caller.organization_id, balance_id)
            .await?;
        if balance.employee_id != caller.employee_id.into_inner() {
            caller.require(Role::Manager, "view another employee's balances")?;
        }
        Ok(balance)
    }

    /// Creates a balance with nothing used yet.
    ///
    /// Callers that want create-or-update semantics use
    /// `AssignmentRepository::assign_leave_type`; a second create for the
    /// same employee, leave type and year hits the unique index.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is HR_ADMIN or above
    /// - `NotFound` if the employee or leave type is not in the organization
    /// - `Validation` for negative day counts
    /// - `Conflict` if the balance already exists
    pub async fn create(
        &self,
        caller: &Caller,
        input: CreateBalanceInput,
    ) -> Result<leave_balances::Model, LeaveError> {
        caller.require(Role::HrAdmin, "create leave balances")?;
        let days = BalanceService::opening(input.total_days, input.carried_over)?;
        find_employee(&self.db, caller.organization_id, input.employee_id).await?;
        find_leave_type(&self.db, caller.organization_id, input.leave_type_id).await?;

        let now = Utc::now().into();
        let created = leave_balances::ActiveModel {
            id: Set(LeaveBalanceId::new().into_inner()),
            employee_id: Set(input.employee_id.into_inner()),
            leave_type_id: Set(input.leave_type_id.into_inner()),
            year: Set(input.year),
            total_days: Set(days.total_days),
            used_days: Set(days.used_days),
            available_days: Set(days.available_days),
            carried_over: Set(days.carried_over),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        info!(
            balance_id = %created.id,
            employee_id = %input.employee_id,
            year = input.year,
            total_days = days.total_days,
            "leave balance created"
        );
        Ok(created)
    }

    /// Edits a balance's allocation.
    ///
    /// `used_days` is never overwritten; `available_days` is recomputed
    /// against it under a row lock.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is HR_ADMIN or above
    /// - `NotFound` if the balance is not in the organization
    /// - `Validation` for negative day counts
    pub async fn update(
        &self,
        caller: &Caller,
        balance_id: LeaveBalanceId,
        input: UpdateBalanceInput,
    ) -> Result<leave_balances::Model, LeaveError> {
        caller.require(Role::HrAdmin, "update leave balances")?;
        self.find_scoped(caller.organization_id, balance_id).await?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let current = leave_balances::Entity::find_by_id(balance_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LeaveError::not_found("LeaveBalance", balance_id))?;

        let days = BalanceService::retotal(balance_days(&current), input.total_days, input.carried_over)?;

        let mut active: leave_balances::ActiveModel = current.into();
        active.total_days = Set(days.total_days);
        active.available_days = Set(days.available_days);
        active.carried_over = Set(days.carried_over);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        info!(
            balance_id = %balance_id,
            total_days = days.total_days,
            available_days = days.available_days,
            "leave balance updated"
        );
        Ok(updated)
    }

    /// Deletes a balance that has no used days.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is HR_ADMIN or above
    /// - `NotFound` if the balance is not in the organization
    /// - `InvalidState` if any days have been used
    pub async fn delete(&self, caller: &Caller, balance_id: LeaveBalanceId) -> Result<(), LeaveError> {
        caller.require(Role::HrAdmin, "delete leave balances")?;
        self.find_scoped(caller.organization_id, balance_id).await?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let current = leave_balances::Entity::find_by_id(balance_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LeaveError::not_found("LeaveBalance", balance_id))?;
        BalanceService::ensure_deletable(current.used_days)?;

        current.delete(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        info!(balance_id = %balance_id, "leave balance deleted");
        Ok(())
    }

    /// Finds a balance through its employee's organization.
    async fn find_scoped(
        &self,
        organization_id: OrganizationId,
        balance_id: LeaveBalanceId,
    ) -> Result<leave_balances::Model, LeaveError> {
        leave_balances::Entity::find_by_id(balance_id.into_inner())
            .join(JoinType::InnerJoin, leave_balances::Relation::Employees.def())
            .filter(employees::Column::OrganizationId.eq(organization_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LeaveError::not_found("LeaveBalance", balance_id))
    }
}
