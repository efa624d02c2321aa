//! ISO-8601 week grouping for timeline headers.
//!
//! A multi-day view renders one "KW n" header per ISO week, spanning as many
//! day columns as the week has inside the visible range. Groups follow the
//! (ISO year, ISO week) pair, so the last days of December can belong to
//! week 1 of the following ISO year.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::DateRange;

/// Consecutive days sharing one ISO week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekGroup {
    /// ISO week number (1..=53).
    pub iso_week: u32,
    /// ISO week-numbering year (may differ from the calendar year).
    pub year: i32,
    /// Days of this week in input order.
    pub days: Vec<NaiveDate>,
}

impl WeekGroup {
    /// Header text, e.g. `"KW 27"`.
    pub fn label(&self) -> String {
        format!("KW {}", self.iso_week)
    }

    /// Number of day columns the header spans.
    pub fn span(&self) -> usize {
        self.days.len()
    }
}

/// Every day of a range, in order.
pub fn days_in_range(range: &DateRange) -> Vec<NaiveDate> {
    range.days().collect()
}

/// Partitions days into consecutive ISO-week groups, preserving order.
///
/// A new group starts whenever the ISO week or ISO year differs from the
/// previous day's.
pub fn group_by_iso_week(days: &[NaiveDate]) -> Vec<WeekGroup> {
    let mut groups: Vec<WeekGroup> = Vec::new();

    for &day in days {
        let iso = day.iso_week();
        match groups.last_mut() {
            Some(group) if group.iso_week == iso.week() && group.year == iso.year() => {
                group.days.push(day);
            }
            _ => groups.push(WeekGroup {
                iso_week: iso.week(),
                year: iso.year(),
                days: vec![day],
            }),
        }
    }

    groups
}
