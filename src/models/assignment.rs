//! Assignment model.
//!
//! An assignment books one employee (or nobody, see [`UNASSIGNED`]) onto a
//! project for an inclusive date range and a daily time window.
//!
//! # Origins
//! - [`AssignmentOrigin::Derived`]: regenerated from a [`PlanItem`](super::PlanItem)
//!   on every sync. Its id is a pure function of the plan item id.
//! - [`AssignmentOrigin::Manual`]: created directly on the timeline and never
//!   touched by sync.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{hhmm, hhmm_opt, DateRange};

/// Employee id used for assignments that have nobody attached.
pub const UNASSIGNED: &str = "unassigned";

/// Where an assignment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentOrigin {
    /// Regenerated from an upstream plan item.
    Derived,
    /// Created directly; survives sync.
    Manual,
}

/// A booking of an employee onto a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Unique assignment identifier.
    pub id: String,
    /// Project this assignment belongs to.
    pub project_id: String,
    /// Assigned employee, or [`UNASSIGNED`].
    pub employee_id: String,
    /// First booked day (inclusive).
    pub start_date: NaiveDate,
    /// Last booked day (inclusive, `>= start_date`).
    pub end_date: NaiveDate,
    /// Daily start time.
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    /// Daily end time (`> start_time`).
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Display color (hex).
    pub color: String,
    /// Derived or manual.
    pub origin: AssignmentOrigin,
}

impl Assignment {
    /// Whether this assignment is regenerated by sync.
    #[inline]
    pub fn is_derived(&self) -> bool {
        self.origin == AssignmentOrigin::Derived
    }

    /// Whether nobody is attached.
    #[inline]
    pub fn is_unassigned(&self) -> bool {
        self.employee_id == UNASSIGNED
    }

    /// Inclusive date range covered.
    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    /// Number of calendar days covered (at least 1).
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Daily working time in minutes.
    pub fn daily_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes().max(0)
    }

    /// Whether the date ranges of two assignments share a day.
    pub fn overlaps_dates(&self, other: &Self) -> bool {
        self.date_range().intersects(&other.date_range())
    }

    /// Whether the daily time windows of two assignments intersect.
    ///
    /// Half-open: `08:00-10:00` and `10:00-12:00` do not overlap.
    pub fn overlaps_times(&self, other: &Self) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

/// Request to create a manual assignment.
///
/// Missing times fall back to the configured defaults; a missing end date
/// makes a single-day assignment; a missing employee books nobody.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentInput {
    pub project_id: String,
    /// `None` books [`UNASSIGNED`].
    #[serde(default)]
    pub employee_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default, with = "hhmm_opt")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    /// Explicit color; derived from the project id when absent.
    #[serde(default)]
    pub color: Option<String>,
}

impl AssignmentInput {
    /// Creates an input for a project starting on `date`.
    pub fn new(project_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            project_id: project_id.into(),
            start_date: Some(date),
            ..Self::default()
        }
    }

    /// Sets the employee.
    pub fn with_employee(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    /// Sets the last day (inclusive).
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Sets the daily time window.
    pub fn with_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets an explicit color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Employee id after applying the unassigned default.
    pub fn employee_or_unassigned(&self) -> &str {
        self.employee_id.as_deref().unwrap_or(UNASSIGNED)
    }
}
