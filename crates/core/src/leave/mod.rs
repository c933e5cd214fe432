//! Leave balance and leave request engine.
//!
//! # Modules
//!
//! - `types` - Request status, lifecycle actions and snapshots
//! - `error` - The leave error type
//! - `balance` - Balance arithmetic
//! - `validation` - Balance check and create/update validation
//! - `lifecycle` - Request state machine
//! - `assignment` - Bulk assignment result aggregation
//! - `leave_type` - Leave type input rules

pub mod assignment;
pub mod balance;
pub mod error;
pub mod leave_type;
pub mod lifecycle;
pub mod types;
pub mod validation;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod lifecycle_props;

pub use assignment::{
    AssignmentFailure, AssignmentSuccess, AssignmentSummary, AssignmentSyncResult,
    BulkAssignmentResult,
};
pub use balance::{BalanceDays, BalanceService};
pub use error::LeaveError;
pub use lifecycle::LeaveWorkflow;
pub use types::{BalanceSnapshot, LeaveAction, LeaveStatus, LeaveTypeSummary, OverlappingLeave};
pub use validation::{BalanceCheck, DateScreen, LeaveConflict, LeaveValidator};
