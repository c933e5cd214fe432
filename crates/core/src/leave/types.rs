//! Leave domain types.
//!
//! Request status, the actions produced by lifecycle transitions, and the
//! read-only snapshots the validator and lifecycle hand back to callers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use leavewise_shared::types::{EmployeeId, LeaveBalanceId, LeaveRequestId, LeaveTypeId};

/// Leave request status.
///
/// The valid transitions are:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
/// - Pending → Cancelled (cancel)
/// - Approved → Cancelled (cancel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeaveStatus {
    /// Submitted and awaiting a decision. The only editable state.
    Pending,
    /// Approved; the balance has been debited.
    Approved,
    /// Rejected by an approver (terminal).
    Rejected,
    /// Withdrawn by the requester or HR (terminal).
    Cancelled,
}

impl LeaveStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if the request can still be modified.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled)
    }

    /// Returns true if a request in this status occupies its dates, so new
    /// requests may not overlap it.
    #[must_use]
    pub const fn blocks_dates(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state transition with its audit data.
#[derive(Debug, Clone)]
pub enum LeaveAction {
    /// Approve a pending request.
    Approve {
        /// The new status after approval.
        new_status: LeaveStatus,
        /// The approver.
        approved_by: EmployeeId,
        /// When the request was approved.
        approved_at: DateTime<Utc>,
    },
    /// Reject a pending request.
    Reject {
        /// The new status after rejection.
        new_status: LeaveStatus,
        /// The rejecter.
        rejected_by: EmployeeId,
        /// When the request was rejected.
        rejected_at: DateTime<Utc>,
        /// Mandatory reason, stored as a comment.
        reason: String,
    },
    /// Cancel a pending or approved request.
    Cancel {
        /// The new status after cancellation.
        new_status: LeaveStatus,
        /// Who cancelled.
        cancelled_by: EmployeeId,
        /// When the request was cancelled.
        cancelled_at: DateTime<Utc>,
        /// Optional reason, stored as a comment when present.
        reason: Option<String>,
        /// True when the request had been approved, so its days were debited.
        was_approved: bool,
    },
}

impl LeaveAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> LeaveStatus {
        match self {
            Self::Approve { new_status, .. }
            | Self::Reject { new_status, .. }
            | Self::Cancel { new_status, .. } => *new_status,
        }
    }

    /// The employee performing the action.
    #[must_use]
    pub fn actor(&self) -> EmployeeId {
        match self {
            Self::Approve { approved_by, .. } => *approved_by,
            Self::Reject { rejected_by, .. } => *rejected_by,
            Self::Cancel { cancelled_by, .. } => *cancelled_by,
        }
    }

    /// When the action happened.
    #[must_use]
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::Approve { approved_at, .. } => *approved_at,
            Self::Reject { rejected_at, .. } => *rejected_at,
            Self::Cancel { cancelled_at, .. } => *cancelled_at,
        }
    }

    /// True for the cancellation of an already debited request.
    #[must_use]
    pub fn reverses_debit(&self) -> bool {
        matches!(self, Self::Cancel { was_approved: true, .. })
    }

    /// The comment body this action leaves on the request, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        match self {
            Self::Approve { .. } => None,
            Self::Reject { reason, .. } => Some(reason),
            Self::Cancel { reason, .. } => reason.as_deref(),
        }
    }
}

/// An existing request that collides with a requested date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlappingLeave {
    /// The existing request.
    pub id: LeaveRequestId,
    /// First day of the existing request.
    pub start_date: NaiveDate,
    /// Last day of the existing request.
    pub end_date: NaiveDate,
    /// Name of its leave type.
    pub leave_type_name: String,
    /// Its status (pending or approved).
    pub status: LeaveStatus,
    /// Its business-day count.
    pub total_days: i32,
}

/// Leave type as shown next to a balance check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTypeSummary {
    /// Leave type id.
    pub id: LeaveTypeId,
    /// Display name, e.g. "Annual Leave".
    pub name: String,
    /// Default yearly allocation.
    pub max_days_per_year: i32,
}

/// Point-in-time view of a balance row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Balance id.
    pub id: LeaveBalanceId,
    /// Allocation year.
    pub year: i32,
    /// Days allocated for the year.
    pub total_days: i32,
    /// Days consumed by approved requests.
    pub used_days: i32,
    /// Days still available.
    pub available_days: i32,
    /// Days rolled over from the previous year.
    pub carried_over: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(LeaveStatus::Pending.as_str(), "PENDING");
        assert_eq!(LeaveStatus::Approved.as_str(), "APPROVED");
        assert_eq!(LeaveStatus::Rejected.as_str(), "REJECTED");
        assert_eq!(LeaveStatus::Cancelled.as_str(), "CANCELLED");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(LeaveStatus::parse("pending"), Some(LeaveStatus::Pending));
        assert_eq!(LeaveStatus::parse("APPROVED"), Some(LeaveStatus::Approved));
        assert_eq!(LeaveStatus::parse("Rejected"), Some(LeaveStatus::Rejected));
        assert_eq!(LeaveStatus::parse("cancelled"), Some(LeaveStatus::Cancelled));
        assert_eq!(LeaveStatus::parse("draft"), None);
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&LeaveStatus::Cancelled).unwrap();
        assert_eq!(json, "\"CANCELLED\"");
        let parsed: LeaveStatus = serde_json::from_str("\"PENDING\"").unwrap();
        assert_eq!(parsed, LeaveStatus::Pending);
    }

    #[test]
    fn test_status_flags() {
        assert!(LeaveStatus::Pending.is_editable());
        assert!(!LeaveStatus::Approved.is_editable());

        assert!(LeaveStatus::Rejected.is_terminal());
        assert!(LeaveStatus::Cancelled.is_terminal());
        assert!(!LeaveStatus::Approved.is_terminal());

        assert!(LeaveStatus::Pending.blocks_dates());
        assert!(LeaveStatus::Approved.blocks_dates());
        assert!(!LeaveStatus::Rejected.blocks_dates());
        assert!(!LeaveStatus::Cancelled.blocks_dates());
    }
}
