//! Leave request state machine.
//!
//! Pure transition logic: given the current status, decide whether an action
//! is allowed and produce the `LeaveAction` the repository applies inside one
//! database transaction.

use chrono::Utc;

use leavewise_shared::types::EmployeeId;

use crate::leave::error::LeaveError;
use crate::leave::types::{LeaveAction, LeaveStatus};

/// Stateless service for leave request transitions.
pub struct LeaveWorkflow;

impl LeaveWorkflow {
    /// Fails with `InvalidState` unless the request is still pending.
    pub fn ensure_editable(current_status: LeaveStatus) -> Result<(), LeaveError> {
        if current_status.is_editable() {
            Ok(())
        } else {
            Err(LeaveError::InvalidState(format!(
                "only pending requests can be edited; this request is {current_status}"
            )))
        }
    }

    /// Approve a pending request.
    ///
    /// # Returns
    /// * `Ok(LeaveAction::Approve)` if the request is pending
    /// * `Err(LeaveError::InvalidTransition)` otherwise
    pub fn approve(
        current_status: LeaveStatus,
        approved_by: EmployeeId,
    ) -> Result<LeaveAction, LeaveError> {
        match current_status {
            LeaveStatus::Pending => Ok(LeaveAction::Approve {
                new_status: LeaveStatus::Approved,
                approved_by,
                approved_at: Utc::now(),
            }),
            _ => Err(LeaveError::InvalidTransition {
                from: current_status,
                to: LeaveStatus::Approved,
            }),
        }
    }

    /// Reject a pending request.
    ///
    /// The status is checked before the reason, so a decided request reports
    /// `InvalidTransition` whatever reason is given.
    ///
    /// # Returns
    /// * `Ok(LeaveAction::Reject)` if the request is pending
    /// * `Err(LeaveError::InvalidTransition)` if not pending
    /// * `Err(LeaveError::Validation)` if the reason is blank
    pub fn reject(
        current_status: LeaveStatus,
        rejected_by: EmployeeId,
        reason: String,
    ) -> Result<LeaveAction, LeaveError> {
        if current_status != LeaveStatus::Pending {
            return Err(LeaveError::InvalidTransition {
                from: current_status,
                to: LeaveStatus::Rejected,
            });
        }

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(LeaveError::Validation(
                "a reason is required to reject a leave request".to_string(),
            ));
        }

        Ok(LeaveAction::Reject {
            new_status: LeaveStatus::Rejected,
            rejected_by,
            rejected_at: Utc::now(),
            reason: reason.to_string(),
        })
    }

    /// Cancel a pending or approved request.
    ///
    /// A blank reason is treated as no reason. `was_approved` on the returned
    /// action tells the caller whether a balance debit needs reversing.
    pub fn cancel(
        current_status: LeaveStatus,
        cancelled_by: EmployeeId,
        reason: Option<String>,
    ) -> Result<LeaveAction, LeaveError> {
        match current_status {
            LeaveStatus::Pending | LeaveStatus::Approved => Ok(LeaveAction::Cancel {
                new_status: LeaveStatus::Cancelled,
                cancelled_by,
                cancelled_at: Utc::now(),
                reason: reason
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty()),
                was_approved: current_status == LeaveStatus::Approved,
            }),
            _ => Err(LeaveError::InvalidTransition {
                from: current_status,
                to: LeaveStatus::Cancelled,
            }),
        }
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved, Rejected, Cancelled
    /// - Approved → Cancelled
    #[must_use]
    pub fn is_valid_transition(from: LeaveStatus, to: LeaveStatus) -> bool {
        matches!(
            (from, to),
            (
                LeaveStatus::Pending,
                LeaveStatus::Approved | LeaveStatus::Rejected | LeaveStatus::Cancelled
            ) | (LeaveStatus::Approved, LeaveStatus::Cancelled)
        )
    }
}
