//! Leave type repository.
//!
//! Leave types are organization-scoped. Deletion is refused while any
//! balance, request or policy still points at the type.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use leavewise_core::auth::{Caller, Role};
use leavewise_core::leave::{LeaveError, leave_type};
use leavewise_shared::types::{LeavePolicyId, LeaveTypeId, OrganizationId};

use crate::entities::{leave_balances, leave_policies, leave_requests, leave_types};

use super::{db_err, find_leave_type};

/// Input for creating a leave type.
#[derive(Debug, Clone)]
pub struct CreateLeaveTypeInput {
    /// Name, unique within the organization.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Default yearly allocation.
    pub max_days_per_year: i32,
}

/// Input for updating a leave type. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateLeaveTypeInput {
    /// New name.
    pub name: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New default yearly allocation.
    pub max_days_per_year: Option<i32>,
}

/// Leave type repository.
#[derive(Debug, Clone)]
pub struct LeaveTypeRepository {
    db: DatabaseConnection,
}

impl LeaveTypeRepository {
    /// Creates a new leave type repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a leave type.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is HR_ADMIN or above
    /// - `Validation` for a blank name or negative allocation
    /// - `Conflict` if the name is already used in the organization
    pub async fn create(
        &self,
        caller: &Caller,
        input: CreateLeaveTypeInput,
    ) -> Result<leave_types::Model, LeaveError> {
        caller.require(Role::HrAdmin, "create leave types")?;
        let name = leave_type::normalize_name(&input.name)?;
        leave_type::validate_max_days(input.max_days_per_year)?;
        self.ensure_name_available(caller.organization_id, &name, None)
            .await?;

        let now = Utc::now().into();
        let created = leave_types::ActiveModel {
            id: Set(LeaveTypeId::new().into_inner()),
            organization_id: Set(caller.organization_id.into_inner()),
            name: Set(name),
            description: Set(input.description),
            max_days_per_year: Set(input.max_days_per_year),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        info!(leave_type_id = %created.id, name = %created.name, "leave type created");
        Ok(created)
    }

    /// Updates a leave type.
    ///
    /// Existing balances keep their allocation; only future assignments
    /// that omit `total_days` pick up a new `max_days_per_year`.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is HR_ADMIN or above
    /// - `NotFound` if the leave type is not in the organization
    /// - `Validation` / `Conflict` as for `create`
    pub async fn update(
        &self,
        caller: &Caller,
        leave_type_id: LeaveTypeId,
        input: UpdateLeaveTypeInput,
    ) -> Result<leave_types::Model, LeaveError> {
        caller.require(Role::HrAdmin, "update leave types")?;
        let existing = find_leave_type(&self.db, caller.organization_id, leave_type_id).await?;

        let mut active: leave_types::ActiveModel = existing.into();
        if let Some(name) = input.name {
            let name = leave_type::normalize_name(&name)?;
            self.ensure_name_available(caller.organization_id, &name, Some(leave_type_id))
                .await?;
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(max_days) = input.max_days_per_year {
            leave_type::validate_max_days(max_days)?;
            active.max_days_per_year = Set(max_days);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await.map_err(db_err)?;
        info!(leave_type_id = %leave_type_id, "leave type updated");
        Ok(updated)
    }

    /// Gets a leave type of the caller's organization.
    ///
    /// # Errors
    ///
    /// `NotFound` if the leave type is not in the organization.
    pub async fn get(
        &self,
        caller: &Caller,
        leave_type_id: LeaveTypeId,
    ) -> Result<leave_types::Model, LeaveError> {
        find_leave_type(&self.db, caller.organization_id, leave_type_id).await
    }

    /// Lists the organization's leave types by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, caller: &Caller) -> Result<Vec<leave_types::Model>, LeaveError> {
        leave_types::Entity::find()
            .filter(leave_types::Column::OrganizationId.eq(caller.organization_id.into_inner()))
            .order_by_asc(leave_types::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Deletes a leave type nothing references.
    ///
    /// The reference counts and the delete run in one transaction.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is HR_ADMIN or above
    /// - `NotFound` if the leave type is not in the organization
    /// - `InvalidState` while balances, requests or policies reference it
    pub async fn delete(&self, caller: &Caller, leave_type_id: LeaveTypeId) -> Result<(), LeaveError> {
        caller.require(Role::HrAdmin, "delete leave types")?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let existing = find_leave_type(&txn, caller.organization_id, leave_type_id).await?;
        let id = leave_type_id.into_inner();

        let balances = leave_balances::Entity::find()
            .filter(leave_balances::Column::LeaveTypeId.eq(id))
            .count(&txn)
            .await
            .map_err(db_err)?;
        let requests = leave_requests::Entity::find()
            .filter(leave_requests::Column::LeaveTypeId.eq(id))
            .count(&txn)
            .await
            .map_err(db_err)?;
        let policies = leave_policies::Entity::find()
            .filter(leave_policies::Column::LeaveTypeId.eq(id))
            .count(&txn)
            .await
            .map_err(db_err)?;
        leave_type::ensure_unreferenced(balances, requests, policies)?;

        existing.delete(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        info!(leave_type_id = %leave_type_id, "leave type deleted");
        Ok(())
    }

    /// Attaches a named policy to a leave type.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is HR_ADMIN or above
    /// - `NotFound` if the leave type is not in the organization
    /// - `Validation` for a blank name
    pub async fn create_policy(
        &self,
        caller: &Caller,
        leave_type_id: LeaveTypeId,
        name: &str,
    ) -> Result<leave_policies::Model, LeaveError> {
        caller.require(Role::HrAdmin, "create leave policies")?;
        find_leave_type(&self.db, caller.organization_id, leave_type_id).await?;

        let name = name.trim();
        if name.is_empty() {
            return Err(LeaveError::Validation(
                "policy name must not be empty".to_string(),
            ));
        }

        let policy = leave_policies::ActiveModel {
            id: Set(LeavePolicyId::new().into_inner()),
            organization_id: Set(caller.organization_id.into_inner()),
            leave_type_id: Set(leave_type_id.into_inner()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        info!(policy_id = %policy.id, leave_type_id = %leave_type_id, "leave policy created");
        Ok(policy)
    }

    /// Lists the policies attached to a leave type.
    ///
    /// # Errors
    ///
    /// `NotFound` if the leave type is not in the organization.
    pub async fn list_policies(
        &self,
        caller: &Caller,
        leave_type_id: LeaveTypeId,
    ) -> Result<Vec<leave_policies::Model>, LeaveError> {
        let leave_type = find_leave_type(&self.db, caller.organization_id, leave_type_id).await?;
        leave_type
            .find_related(leave_policies::Entity)
            .order_by_asc(leave_policies::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn ensure_name_available(
        &self,
        organization_id: OrganizationId,
        name: &str,
        except: Option<LeaveTypeId>,
    ) -> Result<(), LeaveError> {
        let mut query = leave_types::Entity::find()
            .filter(leave_types::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(leave_types::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(leave_types::Column::Id.ne(id.into_inner()));
        }

        let taken = query.count(&self.db).await.map_err(db_err)?;
        if taken > 0 {
            Err(LeaveError::Conflict(format!(
                "a leave type named '{name}' already exists"
            )))
        } else {
            Ok(())
        }
    }
}
