//! String-backed enums stored in `TEXT` columns.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee role column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum EmployeeRole {
    /// Regular employee.
    #[sea_orm(string_value = "EMPLOYEE")]
    Employee,
    /// Approver.
    #[sea_orm(string_value = "MANAGER")]
    Manager,
    /// HR administrator.
    #[sea_orm(string_value = "HR_ADMIN")]
    HrAdmin,
    /// Full access.
    #[sea_orm(string_value = "SUPER_ADMIN")]
    SuperAdmin,
}

/// Leave request status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Approved and debited.
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Rejected.
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    /// Cancelled.
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}
