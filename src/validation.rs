//! Input validation for timeline mutations.
//!
//! Every mutation that produces a new assignment value (create, move,
//! resize) runs through [`validate_assignment`]. Detects:
//! - Missing project or employee references
//! - References to projects/employees not in the loaded reference data
//! - Inverted date ranges and empty or inverted time windows
//!
//! [`validate_plan_items`] checks the upstream planning records before they
//! are derived into assignments. Its findings are reported, not fatal: sync
//! skips or normalizes the offending records.
//!
//! All validators collect every problem instead of stopping at the first.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{is_whole_minute, Assignment, Employee, PlanItem, Project, UNASSIGNED};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No project id given.
    MissingProject,
    /// Employee id is empty (use the unassigned sentinel instead).
    MissingEmployee,
    /// Project id not present in the reference data.
    UnknownProject,
    /// Employee id not present in the reference data.
    UnknownEmployee,
    /// No start date given.
    MissingStartDate,
    /// End date before start date.
    InvalidDateRange,
    /// Start time not strictly before end time.
    InvalidTimeRange,
    /// Time string is not `HH:MM`.
    InvalidTime,
    /// Derived assignments are regenerated by sync and cannot be edited.
    DerivedReadOnly,
    /// Two records share the same id.
    DuplicateId,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Known project and employee ids.
///
/// An empty set disables the corresponding check, so the timeline keeps
/// working before reference data has been loaded.
#[derive(Debug, Clone, Default)]
pub struct References {
    project_ids: HashSet<String>,
    employee_ids: HashSet<String>,
}

impl References {
    /// Builds the reference sets from upstream records.
    pub fn from_records(projects: &[Project], employees: &[Employee]) -> Self {
        Self {
            project_ids: projects.iter().map(|p| p.id.clone()).collect(),
            employee_ids: employees.iter().map(|e| e.id.clone()).collect(),
        }
    }

    /// Replaces the known employees.
    pub fn set_employees(&mut self, employees: &[Employee]) {
        self.employee_ids = employees.iter().map(|e| e.id.clone()).collect();
    }

    /// Whether the project is known (always true when none are loaded).
    pub fn knows_project(&self, id: &str) -> bool {
        self.project_ids.is_empty() || self.project_ids.contains(id)
    }

    /// Whether the employee is known (always true when none are loaded).
    /// The unassigned sentinel is always known.
    pub fn knows_employee(&self, id: &str) -> bool {
        id == UNASSIGNED || self.employee_ids.is_empty() || self.employee_ids.contains(id)
    }
}

/// Validates a fully resolved assignment value.
///
/// Checks:
/// 1. Project id is non-empty
/// 2. Employee id is non-empty (the unassigned sentinel is allowed)
/// 3. Project and employee are known to `references`
/// 4. `end_date >= start_date`
/// 5. `start_time < end_time`
/// 6. Both times are whole minutes
pub fn validate_assignment(assignment: &Assignment, references: &References) -> ValidationResult {
    let mut errors = Vec::new();

    if assignment.project_id.trim().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingProject,
            "Assignment has no project",
        ));
    } else if !references.knows_project(&assignment.project_id) {
        errors.push(ValidationError::new(
            ValidationErrorKind::UnknownProject,
            format!("Unknown project '{}'", assignment.project_id),
        ));
    }

    if assignment.employee_id.trim().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingEmployee,
            format!("Employee id is empty; use '{UNASSIGNED}' for no employee"),
        ));
    } else if !references.knows_employee(&assignment.employee_id) {
        errors.push(ValidationError::new(
            ValidationErrorKind::UnknownEmployee,
            format!("Unknown employee '{}'", assignment.employee_id),
        ));
    }

    if assignment.end_date < assignment.start_date {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDateRange,
            format!(
                "End date {} is before start date {}",
                assignment.end_date, assignment.start_date
            ),
        ));
    }

    if assignment.start_time >= assignment.end_time {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidTimeRange,
            format!(
                "Start time {} is not before end time {}",
                assignment.start_time.format("%H:%M"),
                assignment.end_time.format("%H:%M")
            ),
        ));
    }

    for (label, value) in [("Start", assignment.start_time), ("End", assignment.end_time)] {
        if !is_whole_minute(value) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTime,
                format!("{label} time {value} has seconds; times are whole minutes"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks upstream plan items before derivation.
///
/// Checks:
/// 1. No duplicate plan item ids
/// 2. Every item has a project
pub fn validate_plan_items(items: &[PlanItem]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for item in items {
        if !seen.insert(item.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate plan item ID: {}", item.id),
            ));
        }
        if item.project_id.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingProject,
                format!("Plan item '{}' has no project", item.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
