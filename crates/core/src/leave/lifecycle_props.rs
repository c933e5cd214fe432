//! Property-based tests for the leave request state machine.

use proptest::prelude::*;
use uuid::Uuid;

use leavewise_shared::types::EmployeeId;

use crate::leave::error::LeaveError;
use crate::leave::lifecycle::LeaveWorkflow;
use crate::leave::types::{LeaveAction, LeaveStatus};

fn arb_status() -> impl Strategy<Value = LeaveStatus> {
    prop_oneof![
        Just(LeaveStatus::Pending),
        Just(LeaveStatus::Approved),
        Just(LeaveStatus::Rejected),
        Just(LeaveStatus::Cancelled),
    ]
}

fn arb_employee() -> impl Strategy<Value = EmployeeId> {
    any::<u128>().prop_map(|n| EmployeeId::from_uuid(Uuid::from_u128(n)))
}

fn arb_reason() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{0,60}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every successful action lands on a status reachable from the current one.
    #[test]
    fn prop_actions_follow_transition_table(status in arb_status(), by in arb_employee(), reason in arb_reason()) {
        let results = [
            LeaveWorkflow::approve(status, by),
            LeaveWorkflow::reject(status, by, reason.clone()),
            LeaveWorkflow::cancel(status, by, Some(reason)),
        ];
        for result in results {
            match result {
                Ok(action) => prop_assert!(LeaveWorkflow::is_valid_transition(status, action.new_status())),
                Err(LeaveError::InvalidTransition { from, to }) => {
                    prop_assert_eq!(from, status);
                    prop_assert!(!LeaveWorkflow::is_valid_transition(from, to));
                }
                Err(other) => prop_assert!(false, "unexpected error {other:?}"),
            }
        }
    }

    /// Terminal states accept no action at all.
    #[test]
    fn prop_terminal_states_reject_everything(by in arb_employee(), reason in arb_reason()) {
        for status in [LeaveStatus::Rejected, LeaveStatus::Cancelled] {
            prop_assert!(LeaveWorkflow::approve(status, by).is_err());
            prop_assert!(LeaveWorkflow::reject(status, by, reason.clone()).is_err());
            prop_assert!(LeaveWorkflow::cancel(status, by, None).is_err());
            prop_assert!(LeaveWorkflow::ensure_editable(status).is_err());
        }
    }

    /// Only a pending request is editable.
    #[test]
    fn prop_editable_iff_pending(status in arb_status()) {
        prop_assert_eq!(
            LeaveWorkflow::ensure_editable(status).is_ok(),
            status == LeaveStatus::Pending
        );
    }

    /// Audit fields carry the acting employee.
    #[test]
    fn prop_audit_fields_record_actor(by in arb_employee(), reason in arb_reason()) {
        if let Ok(LeaveAction::Approve { approved_by, .. }) = LeaveWorkflow::approve(LeaveStatus::Pending, by) {
            prop_assert_eq!(approved_by, by);
        } else {
            prop_assert!(false, "expected approve action");
        }
        if let Ok(LeaveAction::Reject { rejected_by, .. }) = LeaveWorkflow::reject(LeaveStatus::Pending, by, reason) {
            prop_assert_eq!(rejected_by, by);
        } else {
            prop_assert!(false, "expected reject action");
        }
    }

    /// Cancel reports a debit to reverse exactly when the request was approved.
    #[test]
    fn prop_cancel_restore_flag(status in arb_status(), by in arb_employee()) {
        if let Ok(LeaveAction::Cancel { was_approved, .. }) = LeaveWorkflow::cancel(status, by, None) {
            prop_assert_eq!(was_approved, status == LeaveStatus::Approved);
        }
    }
}
