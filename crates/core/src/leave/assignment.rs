//! Result aggregation for bulk leave-type assignment.
//!
//! Bulk assignment is best effort: each employee is processed on its own and
//! failures are recorded next to successes instead of aborting the batch.

use serde::{Deserialize, Serialize};

use leavewise_shared::types::{EmployeeId, LeaveBalanceId};

use crate::leave::error::LeaveError;

/// An employee whose balance was created or updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSuccess {
    /// The employee.
    pub employee_id: EmployeeId,
    /// The employee's display name.
    pub employee_name: String,
    /// The resulting balance.
    pub balance_id: LeaveBalanceId,
}

/// An employee whose assignment failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentFailure {
    /// The employee id as submitted.
    pub employee_id: EmployeeId,
    /// Name, when the employee could be resolved.
    pub employee_name: Option<String>,
    /// Display message of the failure.
    pub error: String,
    /// Stable error code of the failure.
    pub error_code: String,
}

/// Counts over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSummary {
    /// Employees submitted.
    pub total: usize,
    /// Employees assigned.
    pub successful: usize,
    /// Employees that failed.
    pub failed: usize,
}

/// Outcome of a bulk assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAssignmentResult {
    /// Successful assignments, in input order.
    pub successes: Vec<AssignmentSuccess>,
    /// Failed assignments, in input order.
    pub failures: Vec<AssignmentFailure>,
    /// Counts.
    pub summary: AssignmentSummary,
}

impl BulkAssignmentResult {
    /// Creates an empty result sized for `total` employees.
    #[must_use]
    pub fn with_capacity(total: usize) -> Self {
        Self {
            successes: Vec::with_capacity(total),
            failures: Vec::new(),
            summary: AssignmentSummary::default(),
        }
    }

    /// Records a successful assignment.
    pub fn record_success(
        &mut self,
        employee_id: EmployeeId,
        employee_name: String,
        balance_id: LeaveBalanceId,
    ) {
        self.successes.push(AssignmentSuccess {
            employee_id,
            employee_name,
            balance_id,
        });
        self.summary.total += 1;
        self.summary.successful += 1;
    }

    /// Records a failed assignment.
    pub fn record_failure(
        &mut self,
        employee_id: EmployeeId,
        employee_name: Option<String>,
        error: &LeaveError,
    ) {
        self.failures.push(AssignmentFailure {
            employee_id,
            employee_name,
            error: error.to_string(),
            error_code: error.error_code().to_string(),
        });
        self.summary.total += 1;
        self.summary.failed += 1;
    }

    /// True when every employee was assigned.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.summary.failed == 0
    }
}

/// Outcome of replacing the set of employees assigned to a leave type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSyncResult {
    /// Upserts for the desired employees.
    pub assignment: BulkAssignmentResult,
    /// Employees outside the set whose unused balance was deleted.
    pub removed: Vec<EmployeeId>,
    /// Employees outside the set kept because their balance has used days.
    pub retained: Vec<EmployeeId>,
}
