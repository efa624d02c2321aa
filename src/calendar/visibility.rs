//! Multi-day visibility predicate.
//!
//! Week, two-week, four-week and month views draw one compact chip per
//! assignment per employee per day. Whether a chip appears is a date-only
//! containment check; time-of-day is ignored here and only matters in the
//! single-day slot layout.

use chrono::NaiveDate;

use crate::models::Assignment;

/// Whether `assignment` touches `day` (both ends inclusive).
#[inline]
pub fn is_visible_on_day(assignment: &Assignment, day: NaiveDate) -> bool {
    assignment.start_date <= day && day <= assignment.end_date
}

/// Filters assignments down to those touching `day`.
pub fn visible_on_day<'a, I>(assignments: I, day: NaiveDate) -> Vec<&'a Assignment>
where
    I: IntoIterator<Item = &'a Assignment>,
{
    assignments
        .into_iter()
        .filter(|a| is_visible_on_day(a, day))
        .collect()
}
