//! Typed identifiers for leave entities.
//!
//! Every table keyed by a UUID gets its own newtype, so an `EmployeeId`
//! cannot be passed where a `LeaveTypeId` is expected. New ids are UUID v7
//! and sort by creation time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh time-ordered id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps a UUID read from storage or input.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Unwraps the UUID for queries.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

typed_id!(
    /// Tenant boundary; every other entity is scoped to one organization.
    OrganizationId
);
typed_id!(
    /// An employee record within an organization.
    EmployeeId
);
typed_id!(
    /// A kind of leave, e.g. "Annual Leave".
    LeaveTypeId
);
typed_id!(
    /// One employee's allocation of a leave type for one year.
    LeaveBalanceId
);
typed_id!(
    /// A request for time off.
    LeaveRequestId
);
typed_id!(
    /// A comment left on a leave request.
    LeaveCommentId
);
typed_id!(
    /// A named policy attached to a leave type.
    LeavePolicyId
);

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
