//! Derivation of assignments from upstream plan items.
//!
//! # Rules
//! 1. Id is `plan-{plan_item.id}`; the first item wins when ids repeat.
//! 2. Employee is the first entry of `assigned_employees`, or the unassigned
//!    sentinel. Co-assigned employees are not represented. When an employee
//!    list is supplied, an id missing from it also maps to the sentinel.
//! 3. Dates come from the plan item; an end before the start collapses to
//!    the start day.
//! 4. Missing times take the configured defaults; an empty or inverted time
//!    window is replaced by the defaults.
//! 5. Color comes from the project id; title, description, status and
//!    priority are copied (empty strings become `None`).
//!
//! Items without a project are skipped. The output depends only on the
//! inputs and the config, so deriving twice yields identical values.

use std::collections::HashSet;

use chrono::NaiveTime;
use tracing::{debug, warn};

use crate::config::TimelineConfig;
use crate::display::color_for;
use crate::models::{truncate_to_minute, Assignment, AssignmentOrigin, Employee, PlanItem, UNASSIGNED};
use crate::validation::validate_plan_items;

/// Prefix of every derived assignment id.
pub const DERIVED_ID_PREFIX: &str = "plan-";

/// Id of the assignment derived from a plan item.
pub fn derived_id(plan_item_id: &str) -> String {
    format!("{DERIVED_ID_PREFIX}{plan_item_id}")
}

/// Computes the full derived assignment set, in plan item order.
pub fn derive_assignments(
    plan_items: &[PlanItem],
    employees: &[Employee],
    config: &TimelineConfig,
) -> Vec<Assignment> {
    if let Err(errors) = validate_plan_items(plan_items) {
        for error in &errors {
            warn!(kind = ?error.kind, "Plan item problem: {error}");
        }
    }

    let known: HashSet<&str> = employees.iter().map(|e| e.id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut derived = Vec::with_capacity(plan_items.len());

    for item in plan_items {
        if !seen.insert(item.id.as_str()) || item.project_id.trim().is_empty() {
            continue;
        }

        let employee_id = match item.lead_employee() {
            Some(id) if known.is_empty() || known.contains(id) => id.to_string(),
            Some(id) => {
                debug!(plan_item = %item.id, employee = %id, "Lead employee unknown; deriving as unassigned");
                UNASSIGNED.to_string()
            }
            None => UNASSIGNED.to_string(),
        };

        let (start_time, end_time) = derive_times(item, config);
        let dates = item.date_range();

        derived.push(Assignment {
            id: derived_id(&item.id),
            project_id: item.project_id.clone(),
            employee_id,
            start_date: dates.start,
            end_date: dates.end,
            start_time,
            end_time,
            title: non_empty(&item.title),
            description: non_empty(&item.description),
            status: non_empty(&item.status),
            priority: non_empty(&item.priority),
            color: color_for(&item.project_id).to_string(),
            origin: AssignmentOrigin::Derived,
        });
    }

    derived
}

fn derive_times(item: &PlanItem, config: &TimelineConfig) -> (NaiveTime, NaiveTime) {
    let start = truncate_to_minute(item.start_time.unwrap_or(config.default_start_time));
    let end = truncate_to_minute(item.end_time.unwrap_or(config.default_end_time));
    if start < end {
        (start, end)
    } else {
        warn!(plan_item = %item.id, "Plan item time window is empty or inverted; using defaults");
        (config.default_start_time, config.default_end_time)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
