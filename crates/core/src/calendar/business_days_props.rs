//! Property-based tests for the business-day calendar.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use proptest::prelude::*;

use crate::calendar::business_days::{
    calculate_business_days, is_business_day, is_weekend_only, ranges_overlap,
};

/// Strategy for dates between 2000 and roughly 2060.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..22_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Days::new(offset)
    })
}

/// Strategy for a start date plus a non-negative span in days.
fn arb_range() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (arb_date(), 0u64..800).prop_map(|(start, span)| (start, start + Days::new(span)))
}

/// Walks the range day by day.
fn naive_count(start: NaiveDate, end: NaiveDate) -> i32 {
    let count = start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_business_day(*d))
        .count();
    i32::try_from(count).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The closed form agrees with a day-by-day walk.
    #[test]
    fn prop_matches_day_walk((start, end) in arb_range()) {
        prop_assert_eq!(calculate_business_days(start, end), naive_count(start, end));
    }

    /// A single weekday counts as one business day.
    #[test]
    fn prop_single_weekday_is_one(date in arb_date()) {
        prop_assume!(is_business_day(date));
        prop_assert_eq!(calculate_business_days(date, date), 1);
    }

    /// Any seven consecutive days hold exactly five business days.
    #[test]
    fn prop_any_week_has_five(start in arb_date()) {
        let end = start + Days::new(6);
        prop_assert_eq!(calculate_business_days(start, end), 5);
    }

    /// Saturday-Sunday pairs hold no business days.
    #[test]
    fn prop_weekend_pair_is_zero(date in arb_date()) {
        let saturday = date + Days::new(
            u64::from((Weekday::Sat.num_days_from_monday() + 7
                - date.weekday().num_days_from_monday()) % 7),
        );
        let sunday = saturday + Days::new(1);
        prop_assert_eq!(calculate_business_days(saturday, sunday), 0);
        prop_assert!(is_weekend_only(saturday, sunday));
    }

    /// The count never exceeds the calendar span.
    #[test]
    fn prop_bounded_by_span((start, end) in arb_range()) {
        let span = (end - start).num_days() + 1;
        let days = i64::from(calculate_business_days(start, end));
        prop_assert!(days >= 0);
        prop_assert!(days <= span);
    }

    /// Weekend-only is exactly "non-empty and zero business days".
    #[test]
    fn prop_weekend_only_consistent((start, end) in arb_range()) {
        prop_assert_eq!(
            is_weekend_only(start, end),
            calculate_business_days(start, end) == 0
        );
    }

    /// Overlap is symmetric.
    #[test]
    fn prop_overlap_symmetric((a_start, a_end) in arb_range(), (b_start, b_end) in arb_range()) {
        prop_assert_eq!(
            ranges_overlap(a_start, a_end, b_start, b_end),
            ranges_overlap(b_start, b_end, a_start, a_end)
        );
    }
}
