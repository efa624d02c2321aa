//! The scheduler facade.
//!
//! Constructed once per session by the caller and passed by reference.
//! All state (view, repository, reference data) lives in the instance.

use chrono::NaiveDate;
use tracing::debug;

use super::WorkloadReport;
use crate::calendar::{self, Direction, WeekGroup};
use crate::config::TimelineConfig;
use crate::display;
use crate::error::TimelineResult;
use crate::layout::{self, DayLayout, SlotGrid};
use crate::models::{
    Assignment, AssignmentInput, DateRange, Employee, PlanItem, Project, ViewState, ZoomLevel,
    UNASSIGNED,
};
use crate::repository::{AssignmentFilter, AssignmentRepository, KeyValueStore, SyncReport};
use crate::validation::References;

/// Display name of the row collecting unassigned work.
pub const UNASSIGNED_ROW_NAME: &str = "Unassigned";

/// Assignments of one row on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayChips<'a> {
    pub date: NaiveDate,
    pub assignments: Vec<&'a Assignment>,
}

/// One employee row of a multi-day view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRow<'a> {
    pub employee_id: String,
    pub name: String,
    /// One entry per visible day, in order.
    pub days: Vec<DayChips<'a>>,
}

impl EmployeeRow<'_> {
    /// Total chips across all days (multi-day assignments count per day).
    pub fn chip_count(&self) -> usize {
        self.days.iter().map(|d| d.assignments.len()).sum()
    }
}

/// Resource timeline scheduler.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_timeline::config::TimelineConfig;
/// use u_timeline::models::{AssignmentInput, Employee, ZoomLevel};
/// use u_timeline::repository::MemoryStore;
/// use u_timeline::scheduler::TimelineScheduler;
///
/// let today = NaiveDate::from_ymd_opt(2023, 7, 5).unwrap();
/// let employees = vec![Employee::new("e1", "Anna")];
/// let mut scheduler = TimelineScheduler::new(
///     MemoryStore::default(),
///     TimelineConfig::default(),
///     today,
///     Vec::new(),
///     employees,
///     &[],
/// )
/// .unwrap();
///
/// scheduler
///     .create_assignment(AssignmentInput::new("p1", today).with_employee("e1"))
///     .unwrap();
///
/// assert_eq!(scheduler.view().zoom, ZoomLevel::Week);
/// assert_eq!(scheduler.visible_assignments().len(), 1);
/// ```
#[derive(Debug)]
pub struct TimelineScheduler<S: KeyValueStore> {
    repository: AssignmentRepository<S>,
    view: ViewState,
    grid: SlotGrid,
    projects: Vec<Project>,
    employees: Vec<Employee>,
}

impl<S: KeyValueStore> TimelineScheduler<S> {
    /// Opens the repository and sets the view to the configured zoom at
    /// `anchor`.
    ///
    /// # Errors
    /// Invalid configuration, or a stored snapshot that cannot be read.
    pub fn new(
        store: S,
        config: TimelineConfig,
        anchor: NaiveDate,
        projects: Vec<Project>,
        employees: Vec<Employee>,
        plan_items: &[PlanItem],
    ) -> TimelineResult<Self> {
        let grid = config.slot_grid();
        let view = ViewState::new(config.default_zoom, anchor);
        let mut repository = AssignmentRepository::open(store, config, plan_items, &employees)?;
        repository.set_references(References::from_records(&projects, &employees));

        Ok(Self {
            repository,
            view,
            grid,
            projects,
            employees,
        })
    }

    // ---- view ----

    /// Current zoom and anchor.
    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Visible range of the current view.
    pub fn visible_range(&self) -> DateRange {
        self.view.range()
    }

    /// Range for an arbitrary zoom and anchor.
    pub fn resolve_range(&self, zoom: ZoomLevel, anchor: NaiveDate) -> DateRange {
        calendar::resolve_range(zoom, anchor)
    }

    /// Steps the anchor one unit of the current zoom and returns it.
    pub fn navigate(&mut self, direction: Direction) -> NaiveDate {
        self.view.anchor = calendar::navigate(direction, self.view.zoom, self.view.anchor);
        debug!(anchor = %self.view.anchor, zoom = %self.view.zoom, "Navigated");
        self.view.anchor
    }

    pub fn set_zoom(&mut self, zoom: ZoomLevel) {
        self.view.zoom = zoom;
    }

    pub fn set_anchor(&mut self, anchor: NaiveDate) {
        self.view.anchor = anchor;
    }

    /// Week header groups for the visible range.
    pub fn week_groups(&self) -> Vec<WeekGroup> {
        let days = calendar::days_in_range(&self.visible_range());
        calendar::group_by_iso_week(&days)
    }

    /// Label truncated for the current zoom.
    pub fn truncate(&self, name: &str) -> String {
        display::truncate(name, self.view.zoom)
    }

    /// Whether `assignment` is drawn on `day`.
    pub fn is_visible_on_day(&self, assignment: &Assignment, day: NaiveDate) -> bool {
        calendar::is_visible_on_day(assignment, day)
    }

    // ---- reference data ----

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Replaces projects and employees used for validation and rows.
    pub fn set_reference_data(&mut self, projects: Vec<Project>, employees: Vec<Employee>) {
        self.repository
            .set_references(References::from_records(&projects, &employees));
        self.projects = projects;
        self.employees = employees;
    }

    /// Re-derives plan-driven assignments from fresh upstream data.
    ///
    /// An empty `employees` slice keeps the current employee list.
    pub fn refresh(&mut self, plan_items: &[PlanItem], employees: Vec<Employee>) -> SyncReport {
        if !employees.is_empty() {
            self.employees = employees;
        }
        let report = self.repository.sync_derived(plan_items, &self.employees);
        self.repository
            .set_references(References::from_records(&self.projects, &self.employees));
        report
    }

    // ---- assignments ----

    pub fn repository(&self) -> &AssignmentRepository<S> {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut AssignmentRepository<S> {
        &mut self.repository
    }

    /// Assignments matching `filter`.
    pub fn list_assignments(&self, filter: &AssignmentFilter) -> Vec<Assignment> {
        self.repository.list(filter).into_iter().cloned().collect()
    }

    /// Assignments touching the visible range.
    pub fn visible_assignments(&self) -> Vec<&Assignment> {
        let filter = AssignmentFilter::new().with_date_range(self.visible_range());
        self.repository.list(&filter)
    }

    pub fn create_assignment(&mut self, input: AssignmentInput) -> TimelineResult<Assignment> {
        self.repository.create(input)
    }

    pub fn delete_assignment(&mut self, id: &str) -> bool {
        self.repository.delete(id)
    }

    pub fn move_assignment(
        &mut self,
        id: &str,
        new_employee_id: &str,
        new_start_date: NaiveDate,
    ) -> TimelineResult<Assignment> {
        self.repository
            .move_assignment(id, new_employee_id, new_start_date)
    }

    pub fn resize_assignment(
        &mut self,
        id: &str,
        new_start_date: NaiveDate,
        new_end_date: NaiveDate,
    ) -> TimelineResult<Assignment> {
        self.repository
            .resize_assignment(id, new_start_date, new_end_date)
    }

    // ---- layout ----

    pub fn slot_grid(&self) -> &SlotGrid {
        &self.grid
    }

    /// Slot layout of one employee's day.
    pub fn layout_day(&self, employee_id: &str, day: NaiveDate) -> DayLayout<'_> {
        let filter = AssignmentFilter::new()
            .with_employee(employee_id)
            .with_date_range(DateRange::single(day));
        let todays = self.repository.list(&filter);
        layout::layout_day(&self.grid, &todays)
    }

    /// Per-employee, per-day chip lists for the visible range.
    ///
    /// Rows follow the employee list. An extra unassigned row is appended
    /// when unassigned work is visible. Assignments of employees missing
    /// from the list are not shown in any row.
    pub fn employee_rows(&self) -> Vec<EmployeeRow<'_>> {
        let days = calendar::days_in_range(&self.visible_range());
        let visible = self.visible_assignments();

        let build = |employee_id: &str, name: &str| EmployeeRow {
            employee_id: employee_id.to_string(),
            name: name.to_string(),
            days: days
                .iter()
                .map(|&date| DayChips {
                    date,
                    assignments: calendar::visible_on_day(
                        visible.iter().copied().filter(|a| a.employee_id == employee_id),
                        date,
                    ),
                })
                .collect(),
        };

        let mut rows: Vec<EmployeeRow<'_>> = self
            .employees
            .iter()
            .map(|e| build(&e.id, &e.name))
            .collect();
        if visible.iter().any(|a| a.is_unassigned()) {
            rows.push(build(UNASSIGNED, UNASSIGNED_ROW_NAME));
        }
        rows
    }

    /// Workload of the visible range.
    pub fn workload(&self) -> WorkloadReport {
        WorkloadReport::calculate(self.repository.all(), self.visible_range(), &self.employees)
    }
}
