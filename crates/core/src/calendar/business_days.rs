//! Business-day arithmetic.
//!
//! A business day is any calendar day that is not a Saturday or Sunday.
//! There is no holiday calendar.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::leave::error::LeaveError;

/// Returns true if `date` falls on Monday through Friday.
#[must_use]
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts business days from `start` to `end`, both inclusive.
///
/// Returns 0 when `end` is before `start` or when the range holds only
/// weekend days.
#[must_use]
pub fn calculate_business_days(start: NaiveDate, end: NaiveDate) -> i32 {
    if end < start {
        return 0;
    }

    let span = (end - start).num_days() + 1;
    let full_weeks = span / 7;
    let remainder = span % 7;

    // Each full week holds exactly five weekdays; only the tail needs a walk.
    let tail_start = start + Days::new(u64::try_from(full_weeks * 7).unwrap_or(0));
    let tail = tail_start
        .iter_days()
        .take(usize::try_from(remainder).unwrap_or(0))
        .filter(|d| is_business_day(*d))
        .count();

    let total = full_weeks * 5 + i64::try_from(tail).unwrap_or(0);
    i32::try_from(total).unwrap_or(i32::MAX)
}

/// Returns true if every day of the non-empty inclusive range is a
/// Saturday or Sunday.
#[must_use]
pub fn is_weekend_only(start: NaiveDate, end: NaiveDate) -> bool {
    end >= start && calculate_business_days(start, end) == 0
}

/// Inclusive interval overlap: `a` and `b` share at least one day.
#[must_use]
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// Rejects ranges that start before `today` or end before they start.
///
/// Only dates are compared; there is no time-of-day component.
pub fn validate_date_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<(), LeaveError> {
    if start < today {
        return Err(LeaveError::InvalidDateRange(format!(
            "start date {start} is in the past"
        )));
    }
    if end < start {
        return Err(LeaveError::InvalidDateRange(format!(
            "end date {end} is before start date {start}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[rstest]
    // Monday alone
    #[case(d(2024, 6, 10), d(2024, 6, 10), 1)]
    // Saturday + Sunday
    #[case(d(2024, 6, 15), d(2024, 6, 16), 0)]
    // Monday..Friday
    #[case(d(2024, 7, 1), d(2024, 7, 5), 5)]
    // Sunday..Saturday
    #[case(d(2024, 6, 9), d(2024, 6, 15), 5)]
    // Friday..Monday
    #[case(d(2024, 6, 14), d(2024, 6, 17), 2)]
    // two full weeks plus a Monday
    #[case(d(2024, 6, 10), d(2024, 6, 24), 11)]
    // across a month boundary
    #[case(d(2024, 6, 28), d(2024, 7, 2), 3)]
    fn test_calculate_business_days(
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
        #[case] expected: i32,
    ) {
        assert_eq!(calculate_business_days(start, end), expected);
    }

    #[test]
    fn test_reversed_range_is_zero() {
        assert_eq!(calculate_business_days(d(2024, 6, 14), d(2024, 6, 10)), 0);
    }

    #[test]
    fn test_is_weekend_only() {
        assert!(is_weekend_only(d(2024, 6, 15), d(2024, 6, 16)));
        assert!(is_weekend_only(d(2024, 6, 16), d(2024, 6, 16)));
        assert!(!is_weekend_only(d(2024, 6, 15), d(2024, 6, 17)));
        assert!(!is_weekend_only(d(2024, 6, 10), d(2024, 6, 10)));
        assert!(!is_weekend_only(d(2024, 6, 16), d(2024, 6, 15)));
    }

    #[test]
    fn test_ranges_overlap_inclusive() {
        let (s, e) = (d(2024, 6, 10), d(2024, 6, 14));
        assert!(ranges_overlap(s, e, d(2024, 6, 12), d(2024, 6, 20)));
        assert!(ranges_overlap(s, e, d(2024, 6, 14), d(2024, 6, 14)));
        assert!(ranges_overlap(s, e, d(2024, 6, 1), d(2024, 6, 10)));
        assert!(!ranges_overlap(s, e, d(2024, 6, 15), d(2024, 6, 20)));
        assert!(!ranges_overlap(s, e, d(2024, 6, 20), d(2024, 6, 25)));
    }

    #[test]
    fn test_validate_date_range() {
        let today = d(2024, 6, 10);
        assert!(validate_date_range(d(2024, 6, 10), d(2024, 6, 10), today).is_ok());
        assert!(validate_date_range(d(2024, 6, 11), d(2024, 6, 20), today).is_ok());

        let past = validate_date_range(d(2024, 6, 9), d(2024, 6, 12), today).unwrap_err();
        assert!(matches!(past, LeaveError::InvalidDateRange(_)));

        let reversed = validate_date_range(d(2024, 6, 12), d(2024, 6, 11), today).unwrap_err();
        assert!(matches!(reversed, LeaveError::InvalidDateRange(_)));
        assert_eq!(reversed.error_code(), "INVALID_DATE_RANGE");
    }
}
