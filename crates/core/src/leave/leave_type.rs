//! Leave type input rules.

use crate::leave::error::LeaveError;

/// Longest accepted leave type name.
pub const MAX_NAME_LEN: usize = 100;

/// Trims and checks a leave type name.
pub fn normalize_name(name: &str) -> Result<String, LeaveError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LeaveError::Validation(
            "leave type name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(LeaveError::Validation(format!(
            "leave type name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Rejects a negative yearly allocation.
pub fn validate_max_days(max_days_per_year: i32) -> Result<(), LeaveError> {
    if max_days_per_year < 0 {
        Err(LeaveError::Validation(format!(
            "max days per year must be non-negative, got {max_days_per_year}"
        )))
    } else {
        Ok(())
    }
}

/// Fails with `InvalidState` while anything still references the leave type.
pub fn ensure_unreferenced(balances: u64, requests: u64, policies: u64) -> Result<(), LeaveError> {
    let mut refs = Vec::new();
    if balances > 0 {
        refs.push(format!("{balances} balance(s)"));
    }
    if requests > 0 {
        refs.push(format!("{requests} request(s)"));
    }
    if policies > 0 {
        refs.push(format!("{policies} polic(ies)"));
    }

    if refs.is_empty() {
        Ok(())
    } else {
        Err(LeaveError::InvalidState(format!(
            "leave type is still referenced by {}",
            refs.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Annual Leave", "Annual Leave")]
    #[case("  Sick Leave  ", "Sick Leave")]
    fn test_normalize_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_name(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_normalize_name_rejects_blank(#[case] input: &str) {
        assert!(matches!(normalize_name(input), Err(LeaveError::Validation(_))));
    }

    #[test]
    fn test_normalize_name_rejects_long() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(normalize_name(&long).is_err());
    }

    #[test]
    fn test_validate_max_days() {
        assert!(validate_max_days(0).is_ok());
        assert!(validate_max_days(25).is_ok());
        assert!(validate_max_days(-1).is_err());
    }

    #[test]
    fn test_ensure_unreferenced() {
        assert!(ensure_unreferenced(0, 0, 0).is_ok());
        let err = ensure_unreferenced(2, 0, 1).unwrap_err();
        assert!(matches!(err, LeaveError::InvalidState(_)));
        let message = err.to_string();
        assert!(message.contains("2 balance(s)"));
        assert!(message.contains("1 polic(ies)"));
        assert!(!message.contains("request"));
    }
}
