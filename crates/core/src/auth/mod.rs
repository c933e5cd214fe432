//! Caller identity and role hierarchy.
//!
//! Every leave operation receives the caller explicitly. The upstream
//! session layer has already authenticated it; this module only answers
//! "is this role high enough".

use serde::{Deserialize, Serialize};

use leavewise_shared::types::{EmployeeId, OrganizationId};

use crate::leave::error::LeaveError;

/// Employee role within an organization.
///
/// Roles are ordered from lowest to highest privilege.
/// Higher roles can perform all actions of lower roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Can request leave for themselves.
    Employee = 0,
    /// Can approve and reject leave requests.
    Manager = 1,
    /// Manages employees, leave types and balances.
    HrAdmin = 2,
    /// Full access.
    SuperAdmin = 3,
}

impl Role {
    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "EMPLOYEE" => Some(Self::Employee),
            "MANAGER" => Some(Self::Manager),
            "HR_ADMIN" => Some(Self::HrAdmin),
            "SUPER_ADMIN" => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "EMPLOYEE",
            Self::Manager => "MANAGER",
            Self::HrAdmin => "HR_ADMIN",
            Self::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// Returns true if this role is at or above `required` in the hierarchy.
    #[must_use]
    pub fn at_least(self, required: Self) -> bool {
        self >= required
    }

    /// Returns true if this role can approve or reject leave requests.
    #[must_use]
    pub fn can_decide_leave(self) -> bool {
        self.at_least(Self::Manager)
    }

    /// Returns true if this role can manage employees, leave types and balances.
    #[must_use]
    pub fn can_manage_leave(self) -> bool {
        self.at_least(Self::HrAdmin)
    }

    /// Returns true if this role may hand out `target` to another employee.
    #[must_use]
    pub fn can_grant(self, target: Self) -> bool {
        self.can_manage_leave() && self.at_least(target)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated caller of a leave operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// The caller's own employee record.
    pub employee_id: EmployeeId,
    /// The organization the caller is acting in.
    pub organization_id: OrganizationId,
    /// The caller's role in that organization.
    pub role: Role,
}

impl Caller {
    /// Creates a caller context.
    #[must_use]
    pub const fn new(employee_id: EmployeeId, organization_id: OrganizationId, role: Role) -> Self {
        Self {
            employee_id,
            organization_id,
            role,
        }
    }

    /// Fails with `Forbidden` unless the caller holds at least `required`.
    pub fn require(&self, required: Role, action: &str) -> Result<(), LeaveError> {
        if self.role.at_least(required) {
            Ok(())
        } else {
            Err(LeaveError::Forbidden(format!(
                "{} cannot {action}; requires {required}",
                self.role
            )))
        }
    }

    /// Fails with `Forbidden` unless the caller is `owner` or an HR admin.
    pub fn require_self_or_hr(&self, owner: EmployeeId, action: &str) -> Result<(), LeaveError> {
        if self.employee_id == owner || self.role.can_manage_leave() {
            Ok(())
        } else {
            Err(LeaveError::Forbidden(format!(
                "only the requester or an HR admin can {action}"
            )))
        }
    }
}
