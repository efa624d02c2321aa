//! Workload report for a visible range.
//!
//! Summarizes how busy each employee is inside a date range and lists
//! same-employee assignments that overlap in both dates and daily times.
//! The report is informational: overlaps are allowed and nothing here
//! blocks a scheduling command.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Booked days | Distinct days in range with at least one assignment |
//! | Booked minutes | Σ daily minutes × days of the assignment inside the range |
//! | Utilization | Booked days / days in range |

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Assignment, DateRange, Employee};

/// Per-employee figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeWorkload {
    pub employee_id: String,
    pub assignment_count: usize,
    pub booked_days: usize,
    pub booked_minutes: i64,
    /// Booked days / range days (0.0..=1.0).
    pub utilization: f64,
}

/// Two assignments of one employee that share days and daily time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlap {
    pub employee_id: String,
    pub first_id: String,
    pub second_id: String,
    /// Shared days, clipped to the report range.
    pub days: DateRange,
}

/// Workload of every employee with assignments in a range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadReport {
    pub range: DateRange,
    /// Sorted by employee id. The unassigned sentinel appears like any id.
    pub by_employee: Vec<EmployeeWorkload>,
    /// Double bookings; unassigned work is never reported as overlapping.
    pub overlaps: Vec<Overlap>,
}

impl WorkloadReport {
    /// Computes the report for `range`. Assignments outside it are ignored.
    ///
    /// Every employee in `employees` gets an entry, idle ones with zeros.
    pub fn calculate<'a, I>(assignments: I, range: DateRange, employees: &'a [Employee]) -> Self
    where
        I: IntoIterator<Item = &'a Assignment>,
    {
        let mut per_employee: BTreeMap<&str, Vec<&Assignment>> = employees
            .iter()
            .map(|e| (e.id.as_str(), Vec::new()))
            .collect();
        for a in assignments {
            if range.intersects(&a.date_range()) {
                per_employee.entry(a.employee_id.as_str()).or_default().push(a);
            }
        }

        let range_days = range.len_days().max(1) as f64;
        let mut by_employee = Vec::with_capacity(per_employee.len());
        let mut overlaps = Vec::new();

        for (employee_id, items) in &per_employee {
            let mut days: BTreeSet<NaiveDate> = BTreeSet::new();
            let mut booked_minutes = 0i64;

            for a in items {
                if let Some(inside) = clip(&a.date_range(), &range) {
                    days.extend(inside.days());
                    booked_minutes += a.daily_minutes() * inside.len_days();
                }
            }

            by_employee.push(EmployeeWorkload {
                employee_id: employee_id.to_string(),
                assignment_count: items.len(),
                booked_days: days.len(),
                booked_minutes,
                utilization: days.len() as f64 / range_days,
            });

            if *employee_id != crate::models::UNASSIGNED {
                overlaps.extend(find_overlaps(employee_id, items, &range));
            }
        }

        Self {
            range,
            by_employee,
            overlaps,
        }
    }

    /// Figures for one employee.
    pub fn for_employee(&self, employee_id: &str) -> Option<&EmployeeWorkload> {
        self.by_employee.iter().find(|w| w.employee_id == employee_id)
    }

    /// Whether anyone is double-booked.
    pub fn has_overlaps(&self) -> bool {
        !self.overlaps.is_empty()
    }
}

fn clip(a: &DateRange, b: &DateRange) -> Option<DateRange> {
    let start = a.start.max(b.start);
    let end = a.end.min(b.end);
    (start <= end).then(|| DateRange::new(start, end))
}

fn find_overlaps(employee_id: &str, items: &[&Assignment], range: &DateRange) -> Vec<Overlap> {
    let mut found = Vec::new();
    for (i, first) in items.iter().enumerate() {
        for second in &items[i + 1..] {
            if !first.overlaps_times(second) {
                continue;
            }
            let shared = clip(&first.date_range(), &second.date_range())
                .and_then(|shared| clip(&shared, range));
            if let Some(days) = shared {
                found.push(Overlap {
                    employee_id: employee_id.to_string(),
                    first_id: first.id.clone(),
                    second_id: second.id.clone(),
                    days,
                });
            }
        }
    }
    found
}
