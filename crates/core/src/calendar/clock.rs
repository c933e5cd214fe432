//! Source of "today" for date validation and balance-year lookup.

use chrono::{Datelike, NaiveDate, Utc};

/// Provides the current calendar date.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Returns today's date.
    fn today(&self) -> NaiveDate;

    /// Returns the year whose balances are consulted for new requests.
    fn current_year(&self) -> i32 {
        self.today().year()
    }
}

/// Clock backed by the system time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock frozen on a given date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(clock.current_year(), 2024);
    }

    #[test]
    fn test_system_clock_year_matches_today() {
        let clock = SystemClock;
        assert_eq!(clock.current_year(), clock.today().year());
    }
}
