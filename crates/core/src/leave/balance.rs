//! Balance arithmetic.
//!
//! Every balance mutation goes through `BalanceService` so that
//! `available_days == max(0, total_days - used_days)` holds after each write.
//! `carried_over` is stored alongside but never feeds `available_days`.

use serde::{Deserialize, Serialize};

use crate::leave::error::LeaveError;

/// The day counters of one balance row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceDays {
    /// Days allocated for the year.
    pub total_days: i32,
    /// Days consumed by approved requests.
    pub used_days: i32,
    /// Days still available.
    pub available_days: i32,
    /// Days rolled over from the previous year.
    pub carried_over: i32,
}

/// Stateless service for balance calculations.
pub struct BalanceService;

impl BalanceService {
    /// Days available for a given allocation and usage.
    #[must_use]
    pub fn available(total_days: i32, used_days: i32) -> i32 {
        total_days.saturating_sub(used_days).max(0)
    }

    /// Rejects negative allocations.
    pub fn validate_allocation(total_days: i32, carried_over: i32) -> Result<(), LeaveError> {
        if total_days < 0 {
            return Err(LeaveError::Validation(format!(
                "total days must be non-negative, got {total_days}"
            )));
        }
        if carried_over < 0 {
            return Err(LeaveError::Validation(format!(
                "carried over days must be non-negative, got {carried_over}"
            )));
        }
        Ok(())
    }

    /// Counters for a freshly created balance.
    pub fn opening(total_days: i32, carried_over: i32) -> Result<BalanceDays, LeaveError> {
        Self::validate_allocation(total_days, carried_over)?;
        Ok(BalanceDays {
            total_days,
            used_days: 0,
            available_days: Self::available(total_days, 0),
            carried_over,
        })
    }

    /// Applies an allocation edit.
    ///
    /// `used_days` is kept as is; `available_days` is recomputed against it.
    pub fn retotal(
        current: BalanceDays,
        total_days: Option<i32>,
        carried_over: Option<i32>,
    ) -> Result<BalanceDays, LeaveError> {
        let total_days = total_days.unwrap_or(current.total_days);
        let carried_over = carried_over.unwrap_or(current.carried_over);
        Self::validate_allocation(total_days, carried_over)?;

        Ok(BalanceDays {
            total_days,
            used_days: current.used_days,
            available_days: Self::available(total_days, current.used_days),
            carried_over,
        })
    }

    /// Debits `days` for an approved request.
    ///
    /// Both counters move together: used goes up by `days`, available goes
    /// down by the same amount, floored at zero.
    #[must_use]
    pub fn debit(current: BalanceDays, days: i32) -> BalanceDays {
        BalanceDays {
            used_days: current.used_days.saturating_add(days),
            available_days: current.available_days.saturating_sub(days).max(0),
            ..current
        }
    }

    /// Credits `days` back after an approved request is cancelled.
    #[must_use]
    pub fn credit(current: BalanceDays, days: i32) -> BalanceDays {
        let used_days = current.used_days.saturating_sub(days).max(0);
        BalanceDays {
            used_days,
            available_days: Self::available(current.total_days, used_days),
            ..current
        }
    }

    /// Fails with `InvalidState` if any days have been used.
    pub fn ensure_deletable(used_days: i32) -> Result<(), LeaveError> {
        if used_days > 0 {
            Err(LeaveError::InvalidState(format!(
                "balance has been partially used ({used_days} days) and cannot be deleted"
            )))
        } else {
            Ok(())
        }
    }
}
