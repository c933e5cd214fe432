//! Entity re-exports.

pub use super::employees::Entity as Employees;
pub use super::leave_balances::Entity as LeaveBalances;
pub use super::leave_comments::Entity as LeaveComments;
pub use super::leave_policies::Entity as LeavePolicies;
pub use super::leave_requests::Entity as LeaveRequests;
pub use super::leave_types::Entity as LeaveTypes;
pub use super::organizations::Entity as Organizations;
