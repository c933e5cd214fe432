//! Leave request repository.
//!
//! Runs the balance check and every lifecycle transition. Each mutation
//! re-reads the request and the balance row under a lock inside one
//! transaction, so the status change, the balance update and the comment
//! are applied together or not at all.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, JoinType, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use leavewise_core::auth::{Caller, Role};
use leavewise_core::calendar::{Clock, SystemClock};
use leavewise_core::leave::{
    BalanceCheck, BalanceService, LeaveError, LeaveStatus, LeaveTypeSummary,
    LeaveValidator, LeaveWorkflow, OverlappingLeave,
};
use leavewise_shared::types::{
    EmployeeId, LeaveCommentId, LeaveRequestId, LeaveTypeId, OrganizationId, PageRequest,
    PageResponse,
};
use leavewise_shared::LeaveSettings;

use crate::entities::{
    employees, leave_balances, leave_comments, leave_requests, leave_types,
    sea_orm_active_enums::LeaveStatus as DbLeaveStatus,
};

use super::{
    balance_days, balance_snapshot, core_status_to_db, db_err, db_status_to_core,
    find_active_employee, find_balance, find_employee, find_leave_type,
};

/// Input for a balance check.
#[derive(Debug, Clone, Copy)]
pub struct BalanceCheckInput {
    /// Employee who would take the leave.
    pub employee_id: EmployeeId,
    /// Leave type requested.
    pub leave_type_id: LeaveTypeId,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day, inclusive.
    pub end_date: NaiveDate,
}

/// Input for creating a leave request.
#[derive(Debug, Clone)]
pub struct CreateLeaveRequestInput {
    /// Employee taking the leave.
    pub employee_id: EmployeeId,
    /// Leave type.
    pub leave_type_id: LeaveTypeId,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day, inclusive.
    pub end_date: NaiveDate,
    /// Optional reason.
    pub reason: Option<String>,
}

/// Input for editing a pending request. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateLeaveRequestInput {
    /// New leave type.
    pub leave_type_id: Option<LeaveTypeId>,
    /// New first day.
    pub start_date: Option<NaiveDate>,
    /// New last day.
    pub end_date: Option<NaiveDate>,
    /// New reason; `Some(None)` clears it.
    pub reason: Option<Option<String>>,
}

/// Filters for listing an employee's requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaveRequestFilter {
    /// Only this status.
    pub status: Option<LeaveStatus>,
    /// Only requests starting in this year.
    pub year: Option<i32>,
}

/// A pending request with the names an approver needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingLeaveRequest {
    /// The request.
    pub request: leave_requests::Model,
    /// Requester's name.
    pub employee_name: String,
    /// Leave type name.
    pub leave_type_name: String,
}

/// Leave request repository.
#[derive(Debug, Clone)]
pub struct LeaveRequestRepository {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
    settings: LeaveSettings,
}

impl LeaveRequestRepository {
    /// Creates a repository on the system clock with default settings.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            clock: Arc::new(SystemClock),
            settings: LeaveSettings::default(),
        }
    }

    /// Replaces the clock used for "today" and the balance year.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the lifecycle policy switches.
    #[must_use]
    pub const fn with_settings(mut self, settings: LeaveSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Lifecycle policy switches in effect.
    #[must_use]
    pub const fn settings(&self) -> LeaveSettings {
        self.settings
    }

    /// Checks whether a request could be granted, without creating anything.
    ///
    /// Only an invalid date range fails; every other finding is reported as
    /// a conflict. A weekend-only range returns before any balance or
    /// overlap lookup.
    ///
    /// # Errors
    ///
    /// - `InvalidDateRange` if the range starts in the past or is reversed
    /// - `Forbidden` for an employee checking someone else
    /// - `NotFound` if the employee or leave type is not in the organization
    pub async fn check_leave_balance(
        &self,
        caller: &Caller,
        input: BalanceCheckInput,
    ) -> Result<BalanceCheck, LeaveError> {
        let screen =
            LeaveValidator::screen_dates(input.start_date, input.end_date, self.clock.today())?;
        if caller.employee_id != input.employee_id {
            caller.require(Role::Manager, "check another employee's leave balance")?;
        }
        find_employee(&self.db, caller.organization_id, input.employee_id).await?;
        let leave_type = find_leave_type(&self.db, caller.organization_id, input.leave_type_id).await?;
        let summary = leave_type_summary(&leave_type);

        if let Some(check) = LeaveValidator::short_circuit(summary.clone(), screen) {
            return Ok(check);
        }

        let year = self.clock.current_year();
        let balance = find_balance(&self.db, input.employee_id, input.leave_type_id, year).await?;
        let overlapping = find_overlapping(
            &self.db,
            input.employee_id,
            input.start_date,
            input.end_date,
            None,
        )
        .await?;

        Ok(LeaveValidator::evaluate(
            summary,
            balance.as_ref().map(balance_snapshot),
            year,
            screen.business_days(),
            overlapping,
        ))
    }

    /// Creates a pending request.
    ///
    /// `total_days` is computed from the dates. The balance is checked but
    /// not debited; debiting happens on approval.
    ///
    /// # Errors
    ///
    /// - `Forbidden` when requesting for someone else without HR_ADMIN
    /// - `InvalidDateRange` for past, reversed or weekend-only ranges
    /// - `NotFound` for an unknown leave type or inactive employee
    /// - `InsufficientBalance` when the current-year balance is missing or short
    /// - `OverlappingRequest` when pending or approved leave covers the dates
    pub async fn create(
        &self,
        caller: &Caller,
        input: CreateLeaveRequestInput,
    ) -> Result<leave_requests::Model, LeaveError> {
        caller.require_self_or_hr(input.employee_id, "request leave for another employee")?;
        let total_days =
            LeaveValidator::requested_days(input.start_date, input.end_date, self.clock.today())?;
        find_leave_type(&self.db, caller.organization_id, input.leave_type_id).await?;
        find_active_employee(&self.db, caller.organization_id, input.employee_id).await?;
        let year = self.clock.current_year();

        let txn = self.db.begin().await.map_err(db_err)?;
        let balance = lock_balance(&txn, input.employee_id, input.leave_type_id, year).await?;
        LeaveValidator::ensure_sufficient(total_days, balance.map_or(0, |b| b.available_days))?;
        let overlapping = find_overlapping(
            &txn,
            input.employee_id,
            input.start_date,
            input.end_date,
            None,
        )
        .await?;
        LeaveValidator::ensure_no_overlap(overlapping)?;

        let now = Utc::now().into();
        let request = leave_requests::ActiveModel {
            id: Set(LeaveRequestId::new().into_inner()),
            employee_id: Set(input.employee_id.into_inner()),
            leave_type_id: Set(input.leave_type_id.into_inner()),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            total_days: Set(total_days),
            reason: Set(clean_reason(input.reason)),
            status: Set(DbLeaveStatus::Pending),
            approved_by: Set(None),
            approved_at: Set(None),
            rejected_by: Set(None),
            rejected_at: Set(None),
            cancelled_by: Set(None),
            cancelled_at: Set(None),
            debited_balance_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        info!(
            request_id = %request.id,
            employee_id = %input.employee_id,
            total_days,
            "leave request created"
        );
        Ok(request)
    }

    /// Edits a pending request.
    ///
    /// Changing dates or leave type re-runs the date, overlap and balance
    /// checks. The request's own days are added back to the pool when the
    /// leave type stays the same.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the request is not in the organization
    /// - `Forbidden` unless the caller is the requester or HR_ADMIN+
    /// - `InvalidState` unless the request is pending
    /// - as for `create` when dates or leave type change
    pub async fn update(
        &self,
        caller: &Caller,
        request_id: LeaveRequestId,
        input: UpdateLeaveRequestInput,
    ) -> Result<leave_requests::Model, LeaveError> {
        let existing = self.find_scoped(caller.organization_id, request_id).await?;
        let employee_id = EmployeeId::from_uuid(existing.employee_id);
        caller.require_self_or_hr(employee_id, "edit this leave request")?;
        LeaveWorkflow::ensure_editable(db_status_to_core(&existing.status))?;

        let leave_type_id = input
            .leave_type_id
            .unwrap_or(LeaveTypeId::from_uuid(existing.leave_type_id));
        let start_date = input.start_date.unwrap_or(existing.start_date);
        let end_date = input.end_date.unwrap_or(existing.end_date);
        let same_leave_type = leave_type_id.into_inner() == existing.leave_type_id;
        let reschedule =
            !same_leave_type || start_date != existing.start_date || end_date != existing.end_date;

        let total_days = if reschedule {
            let days = LeaveValidator::requested_days(start_date, end_date, self.clock.today())?;
            if !same_leave_type {
                find_leave_type(&self.db, caller.organization_id, leave_type_id).await?;
            }
            days
        } else {
            existing.total_days
        };

        let txn = self.db.begin().await.map_err(db_err)?;
        let current = lock_request(&txn, request_id).await?;
        LeaveWorkflow::ensure_editable(db_status_to_core(&current.status))?;

        if reschedule {
            let year = self.clock.current_year();
            let balance = lock_balance(&txn, employee_id, leave_type_id, year).await?;
            let pool = LeaveValidator::effective_pool(
                balance.map_or(0, |b| b.available_days),
                current.total_days,
                same_leave_type,
            );
            LeaveValidator::ensure_sufficient(total_days, pool)?;
            let overlapping =
                find_overlapping(&txn, employee_id, start_date, end_date, Some(request_id)).await?;
            LeaveValidator::ensure_no_overlap(overlapping)?;
        }

        let mut active: leave_requests::ActiveModel = current.into();
        active.leave_type_id = Set(leave_type_id.into_inner());
        active.start_date = Set(start_date);
        active.end_date = Set(end_date);
        active.total_days = Set(total_days);
        if let Some(reason) = input.reason {
            active.reason = Set(clean_reason(reason));
        }
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        info!(request_id = %request_id, total_days, "leave request updated");
        Ok(updated)
    }

    /// Cancels a pending or approved request.
    ///
    /// With `restore_balance_on_cancel`, cancelling an approved request
    /// credits its days back to the balance it was debited from.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the request is not in the organization
    /// - `Forbidden` unless the caller is the requester or HR_ADMIN+
    /// - `InvalidState` if the request is rejected or already cancelled
    pub async fn cancel(
        &self,
        caller: &Caller,
        request_id: LeaveRequestId,
        reason: Option<String>,
    ) -> Result<leave_requests::Model, LeaveError> {
        let existing = self.find_scoped(caller.organization_id, request_id).await?;
        caller.require_self_or_hr(
            EmployeeId::from_uuid(existing.employee_id),
            "cancel this leave request",
        )?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let current = lock_request(&txn, request_id).await?;
        let action =
            LeaveWorkflow::cancel(db_status_to_core(&current.status), caller.employee_id, reason)?;

        let mut restored = false;
        if action.reverses_debit() && self.settings.restore_balance_on_cancel {
            if let Some(balance_id) = current.debited_balance_id {
                restored = credit_balance(&txn, balance_id, current.total_days).await?;
            }
        }

        let total_days = current.total_days;
        let mut active: leave_requests::ActiveModel = current.into();
        active.status = Set(core_status_to_db(action.new_status()));
        active.cancelled_by = Set(Some(action.actor().into_inner()));
        active.cancelled_at = Set(Some(action.occurred_at().into()));
        if restored {
            active.debited_balance_id = Set(None);
        }
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_err)?;

        if let Some(body) = action.comment() {
            insert_comment(&txn, request_id, action.actor(), body).await?;
        }
        txn.commit().await.map_err(db_err)?;

        info!(
            request_id = %request_id,
            was_approved = action.reverses_debit(),
            restored_days = if restored { total_days } else { 0 },
            "leave request cancelled"
        );
        Ok(updated)
    }

    /// Approves a pending request and debits the current-year balance.
    ///
    /// The status change and the debit are one transaction, with the
    /// balance row locked so concurrent approvals serialize. Without a
    /// balance row the outcome depends on `approve_without_balance`.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is MANAGER or above
    /// - `NotFound` if the request is not in the organization
    /// - `InvalidState` unless the request is pending, or when no balance
    ///   exists and approval without one is disabled
    pub async fn approve(
        &self,
        caller: &Caller,
        request_id: LeaveRequestId,
    ) -> Result<leave_requests::Model, LeaveError> {
        caller.require(Role::Manager, "approve leave requests")?;
        self.find_scoped(caller.organization_id, request_id).await?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let current = lock_request(&txn, request_id).await?;
        let action = LeaveWorkflow::approve(db_status_to_core(&current.status), caller.employee_id)?;

        let employee_id = EmployeeId::from_uuid(current.employee_id);
        let leave_type_id = LeaveTypeId::from_uuid(current.leave_type_id);
        let year = self.clock.current_year();
        let debited = match lock_balance(&txn, employee_id, leave_type_id, year).await? {
            Some(balance) => {
                let balance_id = balance.id;
                let days = BalanceService::debit(balance_days(&balance), current.total_days);
                let mut active: leave_balances::ActiveModel = balance.into();
                active.used_days = Set(days.used_days);
                active.available_days = Set(days.available_days);
                active.updated_at = Set(Utc::now().into());
                active.update(&txn).await.map_err(db_err)?;
                Some(balance_id)
            }
            None if self.settings.approve_without_balance => {
                warn!(
                    request_id = %request_id,
                    employee_id = %employee_id,
                    leave_type_id = %leave_type_id,
                    year,
                    "approving leave request without a balance row; no days debited"
                );
                None
            }
            None => {
                return Err(LeaveError::InvalidState(format!(
                    "employee has no leave balance for {year}; assign one before approving"
                )));
            }
        };

        let total_days = current.total_days;
        let mut active: leave_requests::ActiveModel = current.into();
        active.status = Set(core_status_to_db(action.new_status()));
        active.approved_by = Set(Some(action.actor().into_inner()));
        active.approved_at = Set(Some(action.occurred_at().into()));
        active.debited_balance_id = Set(debited);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        info!(
            request_id = %request_id,
            approved_by = %action.actor(),
            debited_days = if debited.is_some() { total_days } else { 0 },
            "leave request approved"
        );
        Ok(updated)
    }

    /// Rejects a pending request, recording the reason as a comment.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is MANAGER or above
    /// - `NotFound` if the request is not in the organization
    /// - `InvalidState` unless the request is pending
    /// - `Validation` for a blank reason on a pending request
    pub async fn reject(
        &self,
        caller: &Caller,
        request_id: LeaveRequestId,
        reason: String,
    ) -> Result<leave_requests::Model, LeaveError> {
        caller.require(Role::Manager, "reject leave requests")?;
        self.find_scoped(caller.organization_id, request_id).await?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let current = lock_request(&txn, request_id).await?;
        let action =
            LeaveWorkflow::reject(db_status_to_core(&current.status), caller.employee_id, reason)?;

        let mut active: leave_requests::ActiveModel = current.into();
        active.status = Set(core_status_to_db(action.new_status()));
        active.rejected_by = Set(Some(action.actor().into_inner()));
        active.rejected_at = Set(Some(action.occurred_at().into()));
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_err)?;

        if let Some(body) = action.comment() {
            insert_comment(&txn, request_id, action.actor(), body).await?;
        }
        txn.commit().await.map_err(db_err)?;

        info!(request_id = %request_id, rejected_by = %action.actor(), "leave request rejected");
        Ok(updated)
    }

    /// Gets a request of the caller's organization.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the request is not in the organization
    /// - `Forbidden` for an employee viewing someone else's request
    pub async fn get(
        &self,
        caller: &Caller,
        request_id: LeaveRequestId,
    ) -> Result<leave_requests::Model, LeaveError> {
        let request = self.find_scoped(caller.organization_id, request_id).await?;
        if request.employee_id != caller.employee_id.into_inner() {
            caller.require(Role::Manager, "view another employee's leave requests")?;
        }
        Ok(request)
    }

    /// Lists an employee's requests, latest start date first.
    ///
    /// # Errors
    ///
    /// - `Forbidden` for an employee listing someone else
    /// - `NotFound` if the employee is not in the organization
    pub async fn list_for_employee(
        &self,
        caller: &Caller,
        employee_id: EmployeeId,
        filter: LeaveRequestFilter,
        page: PageRequest,
    ) -> Result<PageResponse<leave_requests::Model>, LeaveError> {
        if caller.employee_id != employee_id {
            caller.require(Role::Manager, "view another employee's leave requests")?;
        }
        find_employee(&self.db, caller.organization_id, employee_id).await?;

        let mut query = leave_requests::Entity::find()
            .filter(leave_requests::Column::EmployeeId.eq(employee_id.into_inner()));
        if let Some(status) = filter.status {
            query = query.filter(leave_requests::Column::Status.eq(core_status_to_db(status)));
        }
        if let Some(year) = filter.year {
            let bounds = NaiveDate::from_ymd_opt(year, 1, 1).zip(NaiveDate::from_ymd_opt(year, 12, 31));
            let Some((first, last)) = bounds else {
                return Err(LeaveError::Validation(format!("{year} is not a valid year")));
            };
            query = query.filter(leave_requests::Column::StartDate.between(first, last));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let data = query
            .order_by_desc(leave_requests::Column::StartDate)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(PageResponse::new(data, page, total))
    }

    /// Lists the organization's pending requests, earliest start first.
    ///
    /// # Errors
    ///
    /// `Forbidden` unless the caller is MANAGER or above.
    pub async fn pending_for_org(
        &self,
        caller: &Caller,
    ) -> Result<Vec<PendingLeaveRequest>, LeaveError> {
        caller.require(Role::Manager, "review pending leave requests")?;
        let organization_id = caller.organization_id.into_inner();

        let rows = leave_requests::Entity::find()
            .find_also_related(employees::Entity)
            .filter(employees::Column::OrganizationId.eq(organization_id))
            .filter(leave_requests::Column::Status.eq(DbLeaveStatus::Pending))
            .order_by_asc(leave_requests::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let type_names: HashMap<Uuid, String> = leave_types::Entity::find()
            .filter(leave_types::Column::OrganizationId.eq(organization_id))
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();

        Ok(rows
            .into_iter()
            .map(|(request, employee)| PendingLeaveRequest {
                leave_type_name: type_names
                    .get(&request.leave_type_id)
                    .cloned()
                    .unwrap_or_default(),
                employee_name: employee.map(|e| e.full_name).unwrap_or_default(),
                request,
            })
            .collect())
    }

    /// Lists a request's comments, oldest first.
    ///
    /// # Errors
    ///
    /// As for `get`.
    pub async fn comments(
        &self,
        caller: &Caller,
        request_id: LeaveRequestId,
    ) -> Result<Vec<leave_comments::Model>, LeaveError> {
        let request = self.get(caller, request_id).await?;
        request
            .find_related(leave_comments::Entity)
            .order_by_asc(leave_comments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Finds a request through its employee's organization.
    async fn find_scoped(
        &self,
        organization_id: OrganizationId,
        request_id: LeaveRequestId,
    ) -> Result<leave_requests::Model, LeaveError> {
        leave_requests::Entity::find_by_id(request_id.into_inner())
            .join(JoinType::InnerJoin, leave_requests::Relation::Employees.def())
            .filter(employees::Column::OrganizationId.eq(organization_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LeaveError::not_found("LeaveRequest", request_id))
    }
}

fn leave_type_summary(leave_type: &leave_types::Model) -> LeaveTypeSummary {
    LeaveTypeSummary {
        id: LeaveTypeId::from_uuid(leave_type.id),
        name: leave_type.name.clone(),
        max_days_per_year: leave_type.max_days_per_year,
    }
}

fn clean_reason(reason: Option<String>) -> Option<String> {
    reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}

/// Pending and approved requests of `employee_id` that share a day with the range.
async fn find_overlapping<C: ConnectionTrait>(
    conn: &C,
    employee_id: EmployeeId,
    start_date: NaiveDate,
    end_date: NaiveDate,
    exclude: Option<LeaveRequestId>,
) -> Result<Vec<OverlappingLeave>, LeaveError> {
    let mut query = leave_requests::Entity::find()
        .filter(leave_requests::Column::EmployeeId.eq(employee_id.into_inner()))
        .filter(leave_requests::Column::Status.is_in([DbLeaveStatus::Pending, DbLeaveStatus::Approved]))
        .filter(leave_requests::Column::StartDate.lte(end_date))
        .filter(leave_requests::Column::EndDate.gte(start_date));
    if let Some(id) = exclude {
        query = query.filter(leave_requests::Column::Id.ne(id.into_inner()));
    }

    let rows = query
        .find_also_related(leave_types::Entity)
        .order_by_asc(leave_requests::Column::StartDate)
        .all(conn)
        .await
        .map_err(db_err)?;

    Ok(rows
        .into_iter()
        .map(|(request, leave_type)| OverlappingLeave {
            id: LeaveRequestId::from_uuid(request.id),
            start_date: request.start_date,
            end_date: request.end_date,
            leave_type_name: leave_type.map(|t| t.name).unwrap_or_default(),
            status: db_status_to_core(&request.status),
            total_days: request.total_days,
        })
        .collect())
}

async fn lock_request(
    txn: &DatabaseTransaction,
    request_id: LeaveRequestId,
) -> Result<leave_requests::Model, LeaveError> {
    leave_requests::Entity::find_by_id(request_id.into_inner())
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| LeaveError::not_found("LeaveRequest", request_id))
}

async fn lock_balance(
    txn: &DatabaseTransaction,
    employee_id: EmployeeId,
    leave_type_id: LeaveTypeId,
    year: i32,
) -> Result<Option<leave_balances::Model>, LeaveError> {
    leave_balances::Entity::find()
        .filter(leave_balances::Column::EmployeeId.eq(employee_id.into_inner()))
        .filter(leave_balances::Column::LeaveTypeId.eq(leave_type_id.into_inner()))
        .filter(leave_balances::Column::Year.eq(year))
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)
}

/// Credits `days` back to a balance. Returns false if the row is gone.
async fn credit_balance(
    txn: &DatabaseTransaction,
    balance_id: Uuid,
    days: i32,
) -> Result<bool, LeaveError> {
    let Some(balance) = leave_balances::Entity::find_by_id(balance_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)?
    else {
        return Ok(false);
    };

    let credited = BalanceService::credit(balance_days(&balance), days);
    let mut active: leave_balances::ActiveModel = balance.into();
    active.used_days = Set(credited.used_days);
    active.available_days = Set(credited.available_days);
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await.map_err(db_err)?;
    Ok(true)
}

async fn insert_comment(
    txn: &DatabaseTransaction,
    request_id: LeaveRequestId,
    author_id: EmployeeId,
    body: &str,
) -> Result<leave_comments::Model, LeaveError> {
    leave_comments::ActiveModel {
        id: Set(LeaveCommentId::new().into_inner()),
        leave_request_id: Set(request_id.into_inner()),
        author_id: Set(author_id.into_inner()),
        body: Set(body.to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(txn)
    .await
    .map_err(db_err)
}
