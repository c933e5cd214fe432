//! Business-day calendar for leave requests.
//!
//! Every component that needs a day count goes through
//! [`calculate_business_days`], so request creation, request updates and
//! balance checks can never disagree about how long a request is.

pub mod business_days;
pub mod clock;

#[cfg(test)]
mod business_days_props;

pub use business_days::{
    calculate_business_days, is_business_day, is_weekend_only, ranges_overlap,
    validate_date_range,
};
pub use clock::{Clock, FixedClock, SystemClock};
