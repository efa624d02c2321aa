//! Upstream reference records.
//!
//! These are owned by other modules of the surrounding application and are
//! only read here. [`PlanItem`] seeds derived assignments; [`Employee`] and
//! [`Project`] are referenced by id.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{hhmm_opt, DateRange};

/// An upstream planning record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    /// Unique plan item identifier.
    pub id: String,
    /// Project this item plans work for.
    pub project_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    /// Last day (inclusive). `None` = single day.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default, with = "hhmm_opt")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
    /// Employees planned for this item, in planning order.
    #[serde(default)]
    pub assigned_employees: Vec<String>,
}

impl PlanItem {
    /// Creates a single-day plan item.
    pub fn new(id: impl Into<String>, project_id: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            title: String::new(),
            description: String::new(),
            start_date,
            end_date: None,
            start_time: None,
            end_time: None,
            status: String::new(),
            priority: String::new(),
            assigned_employees: Vec::new(),
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
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

    /// Sets the status label.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the priority label.
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Appends an employee to the planning order.
    pub fn with_employee(mut self, employee_id: impl Into<String>) -> Self {
        self.assigned_employees.push(employee_id.into());
        self
    }

    /// First planned employee, if any.
    pub fn lead_employee(&self) -> Option<&str> {
        self.assigned_employees
            .iter()
            .map(String::as_str)
            .find(|id| !id.trim().is_empty())
    }

    /// Planned dates. An end before the start collapses to the start day.
    pub fn date_range(&self) -> DateRange {
        let end = self
            .end_date
            .filter(|end| *end >= self.start_date)
            .unwrap_or(self.start_date);
        DateRange::new(self.start_date, end)
    }
}

/// An employee row on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    /// Role label (e.g. "Foreman", "Apprentice").
    #[serde(default)]
    pub role: String,
}

impl Employee {
    /// Creates an employee.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: String::new(),
        }
    }

    /// Sets the role label.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}

/// A customer project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub customer: String,
}

impl Project {
    /// Creates a project.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            customer: String::new(),
        }
    }

    /// Sets the customer name.
    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = customer.into();
        self
    }
}
