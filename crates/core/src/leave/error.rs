//! Leave error types.
//!
//! One error type covers every leave operation. Each variant carries a
//! message fit for direct display, an HTTP-like status code, a stable
//! error code and, for balance and overlap failures, structured details.

use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::leave::types::{LeaveStatus, OverlappingLeave};

/// Errors that can occur during leave operations.
#[derive(Debug, Error)]
pub enum LeaveError {
    /// Caller's role is insufficient for the operation.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Entity does not exist, or belongs to another organization.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of entity, e.g. "Employee".
        entity: &'static str,
        /// The identifier that was looked up.
        id: Uuid,
    },

    /// Start date in the past, end before start, or no business days.
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// The entity is not in a state that permits the operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A leave request status transition that the lifecycle does not allow.
    #[error("Cannot move leave request from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: LeaveStatus,
        /// The attempted target status.
        to: LeaveStatus,
    },

    /// Requested days exceed the available days.
    #[error("Insufficient leave balance: requested {requested} days, {available} available")]
    InsufficientBalance {
        /// Business days requested.
        requested: i32,
        /// Days available in the balance pool.
        available: i32,
    },

    /// Requested range overlaps pending or approved leave.
    #[error("Requested dates overlap {} existing leave request(s)", .overlapping.len())]
    OverlappingRequest {
        /// The requests that overlap.
        overlapping: Vec<OverlappingLeave>,
    },

    /// Duplicate unique key.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persistence failure.
    #[error("Database error: {0}")]
    Database(String),
}

impl LeaveError {
    /// Builds a `NotFound` error for the given entity kind.
    pub fn not_found(entity: &'static str, id: impl Into<Uuid>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidDateRange(_) | Self::Validation(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound { .. } => 404,
            Self::InvalidState(_)
            | Self::InvalidTransition { .. }
            | Self::OverlappingRequest { .. }
            | Self::Conflict(_) => 409,
            Self::InsufficientBalance { .. } => 422,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidDateRange(_) => "INVALID_DATE_RANGE",
            Self::InvalidState(_) | Self::InvalidTransition { .. } => "INVALID_STATE",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::OverlappingRequest { .. } => "OVERLAPPING_REQUEST",
            Self::Conflict(_) => "CONFLICT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Structured details the UI can render without re-querying.
    #[must_use]
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::InsufficientBalance {
                requested,
                available,
            } => Some(json!({
                "requested_days": requested,
                "available_days": available,
                "shortage": requested - available,
            })),
            Self::OverlappingRequest { overlapping } => Some(json!({
                "overlapping_leaves": overlapping,
            })),
            Self::InvalidTransition { from, to } => Some(json!({
                "from": from,
                "to": to,
            })),
            _ => None,
        }
    }
}
