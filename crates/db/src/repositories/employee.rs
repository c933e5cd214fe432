//! Employee repository.
//!
//! Employees are created by HR and soft-deleted by clearing `is_active`;
//! rows are never removed while balances or requests reference them.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use leavewise_core::auth::{Caller, Role};
use leavewise_core::leave::LeaveError;
use leavewise_shared::types::EmployeeId;

use crate::entities::employees;

use super::{core_role_to_db, db_err, find_employee};

/// Input for creating an employee.
#[derive(Debug, Clone)]
pub struct CreateEmployeeInput {
    /// Display name.
    pub full_name: String,
    /// Work email, unique within the organization.
    pub email: String,
    /// Role to grant; may not exceed the caller's own role.
    pub role: Role,
    /// Linked user account, when the employee has one.
    pub user_id: Option<uuid::Uuid>,
    /// Direct manager.
    pub manager_id: Option<EmployeeId>,
    /// Department.
    pub department_id: Option<uuid::Uuid>,
}

/// Employee repository.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    db: DatabaseConnection,
}

impl EmployeeRepository {
    /// Creates a new employee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an employee in the caller's organization.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is HR_ADMIN or above and holds at
    ///   least the role being granted
    /// - `Validation` for a blank name or malformed email
    /// - `NotFound` if the manager is not in the organization
    /// - `Conflict` if the email is already used in the organization
    pub async fn create(
        &self,
        caller: &Caller,
        input: CreateEmployeeInput,
    ) -> Result<employees::Model, LeaveError> {
        caller.require(Role::HrAdmin, "create employees")?;
        if !caller.role.can_grant(input.role) {
            return Err(LeaveError::Forbidden(format!(
                "{} cannot grant the {} role",
                caller.role, input.role
            )));
        }

        let full_name = input.full_name.trim();
        if full_name.is_empty() {
            return Err(LeaveError::Validation(
                "employee name must not be empty".to_string(),
            ));
        }
        let email = input.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(LeaveError::Validation(format!(
                "'{email}' is not a valid email address"
            )));
        }

        if let Some(manager_id) = input.manager_id {
            find_employee(&self.db, caller.organization_id, manager_id).await?;
        }

        let taken = employees::Entity::find()
            .filter(employees::Column::OrganizationId.eq(caller.organization_id.into_inner()))
            .filter(employees::Column::Email.eq(email.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        if taken > 0 {
            return Err(LeaveError::Conflict(format!(
                "an employee with email '{email}' already exists"
            )));
        }

        let now = Utc::now().into();
        let employee = employees::ActiveModel {
            id: Set(EmployeeId::new().into_inner()),
            organization_id: Set(caller.organization_id.into_inner()),
            full_name: Set(full_name.to_string()),
            email: Set(email),
            role: Set(core_role_to_db(input.role)),
            is_active: Set(true),
            user_id: Set(input.user_id),
            manager_id: Set(input.manager_id.map(EmployeeId::into_inner)),
            department_id: Set(input.department_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        info!(
            employee_id = %employee.id,
            organization_id = %caller.organization_id,
            role = %input.role,
            "employee created"
        );
        Ok(employee)
    }

    /// Gets an employee of the caller's organization.
    ///
    /// # Errors
    ///
    /// `NotFound` if the employee does not exist in the organization.
    pub async fn get(
        &self,
        caller: &Caller,
        employee_id: EmployeeId,
    ) -> Result<employees::Model, LeaveError> {
        find_employee(&self.db, caller.organization_id, employee_id).await
    }

    /// Lists active employees of the caller's organization by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(&self, caller: &Caller) -> Result<Vec<employees::Model>, LeaveError> {
        employees::Entity::find()
            .filter(employees::Column::OrganizationId.eq(caller.organization_id.into_inner()))
            .filter(employees::Column::IsActive.eq(true))
            .order_by_asc(employees::Column::FullName)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Soft-deletes an employee by clearing `is_active`.
    ///
    /// Balances and requests stay in place.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is HR_ADMIN or above
    /// - `NotFound` if the employee is not in the organization
    /// - `InvalidState` when deactivating oneself
    pub async fn deactivate(
        &self,
        caller: &Caller,
        employee_id: EmployeeId,
    ) -> Result<employees::Model, LeaveError> {
        caller.require(Role::HrAdmin, "deactivate employees")?;
        if caller.employee_id == employee_id {
            return Err(LeaveError::InvalidState(
                "you cannot deactivate your own employee record".to_string(),
            ));
        }

        let employee = find_employee(&self.db, caller.organization_id, employee_id).await?;
        if !employee.is_active {
            return Ok(employee);
        }

        let mut active: employees::ActiveModel = employee.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await.map_err(db_err)?;

        info!(employee_id = %employee_id, "employee deactivated");
        Ok(updated)
    }
}
