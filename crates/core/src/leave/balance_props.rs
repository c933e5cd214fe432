//! Property-based tests for balance arithmetic.

use proptest::prelude::*;

use crate::leave::balance::{BalanceDays, BalanceService};

fn arb_allocation() -> impl Strategy<Value = i32> {
    0i32..400
}

/// A balance that already satisfies the availability invariant.
fn arb_balance() -> impl Strategy<Value = BalanceDays> {
    (arb_allocation(), 0i32..400, 0i32..30).prop_map(|(total, used, carried)| BalanceDays {
        total_days: total,
        used_days: used,
        available_days: BalanceService::available(total, used),
        carried_over: carried,
    })
}

fn holds_invariant(days: &BalanceDays) -> bool {
    days.available_days == (days.total_days - days.used_days).max(0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A new balance starts unused and fully available.
    #[test]
    fn prop_opening_holds_invariant(total in arb_allocation(), carried in 0i32..30) {
        let opened = BalanceService::opening(total, carried).unwrap();
        prop_assert!(holds_invariant(&opened));
        prop_assert_eq!(opened.used_days, 0);
        prop_assert_eq!(opened.available_days, total);
    }

    /// Edits never touch used days and always restore the invariant.
    #[test]
    fn prop_retotal_holds_invariant(
        current in arb_balance(),
        total in proptest::option::of(arb_allocation()),
        carried in proptest::option::of(0i32..30),
    ) {
        let updated = BalanceService::retotal(current, total, carried).unwrap();
        prop_assert!(holds_invariant(&updated));
        prop_assert_eq!(updated.used_days, current.used_days);
    }

    /// A debit moves used and available by exactly the requested days
    /// whenever enough days are available.
    #[test]
    fn prop_debit_is_exact(current in arb_balance(), days in 0i32..50) {
        prop_assume!(days <= current.available_days);
        let debited = BalanceService::debit(current, days);
        prop_assert_eq!(debited.used_days, current.used_days + days);
        prop_assert_eq!(debited.available_days, current.available_days - days);
        prop_assert!(holds_invariant(&debited));
    }

    /// Debits preserve the invariant even when they overdraw.
    #[test]
    fn prop_debit_holds_invariant(current in arb_balance(), days in 0i32..500) {
        prop_assert!(holds_invariant(&BalanceService::debit(current, days)));
    }

    /// Credit undoes debit.
    #[test]
    fn prop_credit_reverses_debit(current in arb_balance(), days in 0i32..50) {
        let round = BalanceService::credit(BalanceService::debit(current, days), days);
        prop_assert_eq!(round, current);
    }
}
