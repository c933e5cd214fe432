//! Leave request validation.
//!
//! `LeaveValidator` turns a proposed date range plus the balance and overlap
//! data the repository loaded into a `BalanceCheck`. Only an invalid date
//! range fails hard; every other problem is collected as a `LeaveConflict`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{calculate_business_days, is_weekend_only, validate_date_range};
use crate::leave::error::LeaveError;
use crate::leave::types::{BalanceSnapshot, LeaveTypeSummary, OverlappingLeave};

/// A single reason a request cannot be granted as proposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LeaveConflict {
    /// The range covers only Saturdays and Sundays.
    WeekendOnly,
    /// The range contains no business day.
    InvalidDates,
    /// No balance row exists for the leave type in `year`.
    NoBalanceRecord {
        /// The year that was looked up.
        year: i32,
    },
    /// Fewer days are available than requested.
    InsufficientBalance {
        /// Business days requested.
        requested: i32,
        /// Days available.
        available: i32,
        /// How many days are missing.
        shortage: i32,
    },
    /// Pending or approved requests already cover some of the dates.
    OverlappingLeave {
        /// The overlapping requests.
        requests: Vec<OverlappingLeave>,
    },
}

impl LeaveConflict {
    /// Stable kind tag, matching the serialized `type` field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::WeekendOnly => "weekend_only",
            Self::InvalidDates => "invalid_dates",
            Self::NoBalanceRecord { .. } => "no_balance_record",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::OverlappingLeave { .. } => "overlapping_leave",
        }
    }

    /// Human-readable explanation.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::WeekendOnly => "The selected dates fall entirely on a weekend".to_string(),
            Self::InvalidDates => "The selected dates contain no business days".to_string(),
            Self::NoBalanceRecord { year } => {
                format!("No leave balance has been assigned for {year}")
            }
            Self::InsufficientBalance {
                requested,
                available,
                shortage,
            } => format!(
                "Requested {requested} days but only {available} are available ({shortage} short)"
            ),
            Self::OverlappingLeave { requests } => format!(
                "The selected dates overlap {} existing leave request(s)",
                requests.len()
            ),
        }
    }
}

/// Result of a balance check. Read-only; producing it mutates nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceCheck {
    /// The leave type being requested.
    pub leave_type: LeaveTypeSummary,
    /// Current-year balance, if one exists.
    pub balance: Option<BalanceSnapshot>,
    /// Business days in the requested range.
    pub requested_days: i32,
    /// True when `conflicts` is empty.
    pub is_allowed: bool,
    /// Every problem found.
    pub conflicts: Vec<LeaveConflict>,
    /// Requests that overlap the range.
    pub overlapping_leaves: Vec<OverlappingLeave>,
}

/// Outcome of screening a date range before any lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateScreen {
    /// Only weekend days; no balance or overlap lookup is needed.
    WeekendOnly,
    /// No business day in the range.
    NoBusinessDays,
    /// The range holds this many business days.
    Workdays(i32),
}

impl DateScreen {
    /// Business days in the range; zero unless `Workdays`.
    #[must_use]
    pub const fn business_days(self) -> i32 {
        match self {
            Self::Workdays(days) => days,
            Self::WeekendOnly | Self::NoBusinessDays => 0,
        }
    }
}

/// Stateless validator for leave requests.
pub struct LeaveValidator;

impl LeaveValidator {
    /// Validates the range and classifies it.
    ///
    /// Fails with `InvalidDateRange` when the range starts before `today` or
    /// ends before it starts. That is the only hard failure of a check.
    pub fn screen_dates(
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<DateScreen, LeaveError> {
        validate_date_range(start, end, today)?;

        if is_weekend_only(start, end) {
            return Ok(DateScreen::WeekendOnly);
        }

        match calculate_business_days(start, end) {
            0 => Ok(DateScreen::NoBusinessDays),
            days => Ok(DateScreen::Workdays(days)),
        }
    }

    /// Business days for a request that is about to be stored.
    ///
    /// Unlike a check, a range with no business days is an error here.
    pub fn requested_days(
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<i32, LeaveError> {
        match Self::screen_dates(start, end, today)? {
            DateScreen::Workdays(days) => Ok(days),
            DateScreen::WeekendOnly => Err(LeaveError::InvalidDateRange(format!(
                "{start} to {end} falls entirely on a weekend"
            ))),
            DateScreen::NoBusinessDays => Err(LeaveError::InvalidDateRange(format!(
                "{start} to {end} contains no business days"
            ))),
        }
    }

    /// The finished check for a range that never reaches the balance lookup.
    #[must_use]
    pub fn short_circuit(leave_type: LeaveTypeSummary, screen: DateScreen) -> Option<BalanceCheck> {
        let conflict = match screen {
            DateScreen::WeekendOnly => LeaveConflict::WeekendOnly,
            DateScreen::NoBusinessDays => LeaveConflict::InvalidDates,
            DateScreen::Workdays(_) => return None,
        };
        Some(BalanceCheck {
            leave_type,
            balance: None,
            requested_days: 0,
            is_allowed: false,
            conflicts: vec![conflict],
            overlapping_leaves: Vec::new(),
        })
    }

    /// Aggregates balance and overlap findings into a check.
    #[must_use]
    pub fn evaluate(
        leave_type: LeaveTypeSummary,
        balance: Option<BalanceSnapshot>,
        year: i32,
        requested_days: i32,
        overlapping_leaves: Vec<OverlappingLeave>,
    ) -> BalanceCheck {
        let mut conflicts = Vec::new();

        match &balance {
            None => conflicts.push(LeaveConflict::NoBalanceRecord { year }),
            Some(snapshot) if snapshot.available_days < requested_days => {
                conflicts.push(LeaveConflict::InsufficientBalance {
                    requested: requested_days,
                    available: snapshot.available_days,
                    shortage: requested_days - snapshot.available_days,
                });
            }
            Some(_) => {}
        }

        if !overlapping_leaves.is_empty() {
            conflicts.push(LeaveConflict::OverlappingLeave {
                requests: overlapping_leaves.clone(),
            });
        }

        BalanceCheck {
            leave_type,
            balance,
            requested_days,
            is_allowed: conflicts.is_empty(),
            conflicts,
            overlapping_leaves,
        }
    }

    /// The pool an edited request is checked against.
    ///
    /// A pending request has not been debited, so its previous days are
    /// added back only when it stays on the same leave type.
    #[must_use]
    pub fn effective_pool(available_days: i32, previous_days: i32, same_leave_type: bool) -> i32 {
        if same_leave_type {
            available_days.saturating_add(previous_days)
        } else {
            available_days
        }
    }

    /// Fails with `InsufficientBalance` when `requested` exceeds `available`.
    pub fn ensure_sufficient(requested: i32, available: i32) -> Result<(), LeaveError> {
        if requested > available {
            Err(LeaveError::InsufficientBalance {
                requested,
                available,
            })
        } else {
            Ok(())
        }
    }

    /// Fails with `OverlappingRequest` when any overlap was found.
    pub fn ensure_no_overlap(overlapping: Vec<OverlappingLeave>) -> Result<(), LeaveError> {
        if overlapping.is_empty() {
            Ok(())
        } else {
            Err(LeaveError::OverlappingRequest { overlapping })
        }
    }
}
