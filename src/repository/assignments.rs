//! Assignment repository.
//!
//! Owns the assignment collection for one session. Constructed once by the
//! composition root and passed by reference; there is no global instance.
//!
//! # Operations
//!
//! | Operation | Touches | Persists |
//! |-----------|---------|----------|
//! | `create` | manual | yes |
//! | `delete` | any (no-op if absent) | yes |
//! | `move_assignment` / `resize_assignment` | manual | yes |
//! | `sync_derived` | derived subset, replaced whole | yes |
//! | `list` / `get` | read-only | no |

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{derive_assignments, KeyValueStore, Snapshot};
use crate::config::TimelineConfig;
use crate::display::color_for;
use crate::error::{StorageError, TimelineError, TimelineResult};
use crate::models::{
    shift_days, Assignment, AssignmentInput, AssignmentOrigin, DateRange, Employee, PlanItem,
};
use crate::validation::{validate_assignment, References, ValidationError, ValidationErrorKind};

/// Query filter for [`AssignmentRepository::list`].
///
/// Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentFilter {
    /// Exact employee id (use the unassigned sentinel for nobody).
    pub employee_id: Option<String>,
    /// Exact project id.
    pub project_id: Option<String>,
    /// Matches assignments whose date range intersects this range.
    pub date_range: Option<DateRange>,
    /// Only assignments of this origin.
    pub origin: Option<AssignmentOrigin>,
}

impl AssignmentFilter {
    /// Matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one employee.
    pub fn with_employee(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    /// Restricts to one project.
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Restricts to assignments intersecting `range`.
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Restricts to one origin.
    pub fn with_origin(mut self, origin: AssignmentOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Whether `assignment` passes every set criterion.
    pub fn matches(&self, assignment: &Assignment) -> bool {
        self.employee_id
            .as_deref()
            .map_or(true, |id| assignment.employee_id == id)
            && self
                .project_id
                .as_deref()
                .map_or(true, |id| assignment.project_id == id)
            && self
                .date_range
                .map_or(true, |range| range.intersects(&assignment.date_range()))
            && self.origin.map_or(true, |origin| assignment.origin == origin)
    }
}

/// Outcome of one [`AssignmentRepository::sync_derived`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Derived ids that did not exist before.
    pub added: Vec<String>,
    /// Derived ids whose content changed.
    pub updated: Vec<String>,
    /// Derived ids whose plan item disappeared.
    pub removed: Vec<String>,
    /// Derived assignments left byte-for-byte identical.
    pub unchanged: usize,
}

impl SyncReport {
    /// Whether the derived subset changed at all.
    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty())
    }
}

/// The assignment collection with write-through persistence.
#[derive(Debug)]
pub struct AssignmentRepository<S: KeyValueStore> {
    store: S,
    config: TimelineConfig,
    assignments: Vec<Assignment>,
    references: References,
    pending_write: bool,
}

impl<S: KeyValueStore> AssignmentRepository<S> {
    /// Loads the repository from `store`.
    ///
    /// An absent or empty snapshot is seeded by deriving from `plan_items`.
    /// An unreadable or newer-version snapshot is an error; the store is not
    /// touched in that case.
    pub fn open(
        store: S,
        config: TimelineConfig,
        plan_items: &[PlanItem],
        employees: &[Employee],
    ) -> TimelineResult<Self> {
        config.validate()?;
        let loaded = match store.load(&config.storage_key)? {
            Some(raw) => Snapshot::decode(&raw)?.assignments,
            None => Vec::new(),
        };

        let mut repo = Self {
            store,
            config,
            assignments: loaded,
            references: References::default(),
            pending_write: false,
        };
        repo.references.set_employees(employees);

        if repo.assignments.is_empty() {
            info!(key = %repo.config.storage_key, "No stored assignments; deriving from plan items");
            repo.sync_derived(plan_items, employees);
        } else {
            info!(
                key = %repo.config.storage_key,
                count = repo.assignments.len(),
                "Loaded assignment snapshot"
            );
        }

        Ok(repo)
    }

    /// Replaces the reference data used to validate new values.
    pub fn set_references(&mut self, references: References) {
        self.references = references;
    }

    pub fn references(&self) -> &References {
        &self.references
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// All assignments in storage order.
    pub fn all(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Looks up an assignment by id.
    pub fn get(&self, id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id == id)
    }

    /// Assignments matching `filter`, in storage order.
    pub fn list(&self, filter: &AssignmentFilter) -> Vec<&Assignment> {
        self.assignments.iter().filter(|a| filter.matches(a)).collect()
    }

    /// Whether the last write-through failed and is waiting for a retry.
    pub fn has_pending_write(&self) -> bool {
        self.pending_write
    }

    /// Creates a manual assignment.
    ///
    /// Fills in the id, the unassigned sentinel, default times, a single-day
    /// end date and the project color where the input leaves them open.
    ///
    /// # Errors
    /// `TimelineError::Validation` if the project is missing, the start date
    /// is missing, a reference is unknown, or a range is inverted.
    pub fn create(&mut self, input: AssignmentInput) -> TimelineResult<Assignment> {
        let start_date = input.start_date.ok_or_else(|| {
            ValidationError::new(
                ValidationErrorKind::MissingStartDate,
                "Assignment has no start date",
            )
        })?;

        let color = input
            .color
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| color_for(&input.project_id).to_string());

        let assignment = Assignment {
            id: self.next_manual_id(),
            employee_id: input.employee_or_unassigned().to_string(),
            project_id: input.project_id,
            start_date,
            end_date: input.end_date.unwrap_or(start_date),
            start_time: input.start_time.unwrap_or(self.config.default_start_time),
            end_time: input.end_time.unwrap_or(self.config.default_end_time),
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            color,
            origin: AssignmentOrigin::Manual,
        };
        validate_assignment(&assignment, &self.references)?;

        debug!(assignment_id = %assignment.id, project = %assignment.project_id, "Created assignment");
        self.assignments.push(assignment.clone());
        self.persist();
        Ok(assignment)
    }

    /// Removes an assignment. Returns whether anything was removed.
    ///
    /// Deleting an unknown id is not an error.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.assignments.len();
        self.assignments.retain(|a| a.id != id);
        let removed = self.assignments.len() != before;
        if removed {
            debug!(assignment_id = %id, "Deleted assignment");
        } else {
            debug!(assignment_id = %id, "Delete of unknown assignment ignored");
        }
        self.persist();
        removed
    }

    /// Moves an assignment to another employee and start date, keeping its
    /// length in days and its daily time window.
    ///
    /// # Errors
    /// `TimelineError::Reference` if `id` is unknown; `TimelineError::Validation`
    /// if the assignment is derived or the new value is invalid.
    pub fn move_assignment(
        &mut self,
        id: &str,
        new_employee_id: &str,
        new_start_date: NaiveDate,
    ) -> TimelineResult<Assignment> {
        self.replace_with(id, |current| {
            let length = (current.end_date - current.start_date).num_days();
            let mut moved = current.clone();
            moved.employee_id = new_employee_id.to_string();
            moved.start_date = new_start_date;
            moved.end_date = shift_days(new_start_date, length).ok_or_else(|| {
                ValidationError::new(
                    ValidationErrorKind::InvalidDateRange,
                    format!("Moving '{}' to {new_start_date} leaves the calendar", current.id),
                )
            })?;
            Ok(moved)
        })
    }

    /// Changes the date range of an assignment.
    ///
    /// # Errors
    /// Same as [`move_assignment`](Self::move_assignment).
    pub fn resize_assignment(
        &mut self,
        id: &str,
        new_start_date: NaiveDate,
        new_end_date: NaiveDate,
    ) -> TimelineResult<Assignment> {
        self.replace_with(id, |current| {
            let mut resized = current.clone();
            resized.start_date = new_start_date;
            resized.end_date = new_end_date;
            Ok(resized)
        })
    }

    /// Replaces the derived subset with the set derived from `plan_items`.
    ///
    /// Manual assignments are kept as they are. The swap happens in one
    /// step, so repeated calls never accumulate duplicates.
    pub fn sync_derived(&mut self, plan_items: &[PlanItem], employees: &[Employee]) -> SyncReport {
        if !employees.is_empty() {
            self.references.set_employees(employees);
        }
        let derived = derive_assignments(plan_items, employees, &self.config);

        let mut previous: HashMap<String, Assignment> = HashMap::new();
        let mut kept = Vec::with_capacity(self.assignments.len());
        for assignment in self.assignments.drain(..) {
            if assignment.is_derived() {
                previous.insert(assignment.id.clone(), assignment);
            } else {
                kept.push(assignment);
            }
        }

        let mut report = SyncReport::default();
        for assignment in &derived {
            match previous.remove(&assignment.id) {
                None => report.added.push(assignment.id.clone()),
                Some(old) if old != *assignment => report.updated.push(assignment.id.clone()),
                Some(_) => report.unchanged += 1,
            }
        }
        report.removed = previous.into_keys().collect();
        report.removed.sort();

        kept.extend(derived);
        self.assignments = kept;

        info!(
            added = report.added.len(),
            updated = report.updated.len(),
            removed = report.removed.len(),
            unchanged = report.unchanged,
            "Synchronized derived assignments"
        );
        self.persist();
        report
    }

    /// Writes the snapshot now, returning any storage error.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        let result = self.write_snapshot();
        self.pending_write = result.is_err();
        result
    }

    fn replace_with<F>(&mut self, id: &str, change: F) -> TimelineResult<Assignment>
    where
        F: FnOnce(&Assignment) -> Result<Assignment, ValidationError>,
    {
        let index = self
            .assignments
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| TimelineError::reference(id))?;

        let current = &self.assignments[index];
        if current.is_derived() {
            return Err(ValidationError::new(
                ValidationErrorKind::DerivedReadOnly,
                format!("Assignment '{id}' is derived from a plan item and cannot be edited"),
            )
            .into());
        }

        let updated = change(current)?;
        validate_assignment(&updated, &self.references)?;

        debug!(assignment_id = %id, "Replaced assignment");
        self.assignments[index] = updated.clone();
        self.persist();
        Ok(updated)
    }

    fn next_manual_id(&self) -> String {
        loop {
            let id = format!("manual-{:016x}", rand::random::<u64>());
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn write_snapshot(&mut self) -> Result<(), StorageError> {
        let raw = Snapshot::new(self.assignments.clone()).encode()?;
        self.store.save(&self.config.storage_key, &raw)
    }

    fn persist(&mut self) {
        match self.write_snapshot() {
            Ok(()) => {
                if self.pending_write {
                    info!(key = %self.config.storage_key, "Snapshot write recovered");
                }
                self.pending_write = false;
            }
            Err(e) => {
                warn!(
                    key = %self.config.storage_key,
                    error = %e,
                    "Failed to persist assignments; in-memory state stays authoritative"
                );
                self.pending_write = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Project, UNASSIGNED};
    use crate::repository::MemoryStore;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    /// Store whose writes can be switched off.
    #[derive(Debug, Default)]
    struct FlakyStore {
        inner: MemoryStore,
        failing: bool,
        writes: usize,
    }

    impl KeyValueStore for FlakyStore {
        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.load(key)
        }

        fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.failing {
                return Err(StorageError::Backend("disk full".into()));
            }
            self.writes += 1;
            self.inner.save(key, value)
        }
    }

    fn plan_items() -> Vec<PlanItem> {
        vec![
            PlanItem::new("1", "proj-a", date(2023, 7, 3))
                .with_end_date(date(2023, 7, 5))
                .with_title("Scaffolding")
                .with_employee("e1"),
            PlanItem::new("2", "proj-a", date(2023, 7, 6))
                .with_title("Roofing")
                .with_employee("e2"),
        ]
    }

    fn employees() -> Vec<Employee> {
        vec![Employee::new("e1", "Anna"), Employee::new("e2", "Ben")]
    }

    fn open_repo() -> AssignmentRepository<MemoryStore> {
        AssignmentRepository::open(
            MemoryStore::new(),
            TimelineConfig::default(),
            &plan_items(),
            &employees(),
        )
        .unwrap()
    }

    fn derived_json(repo: &AssignmentRepository<impl KeyValueStore>) -> String {
        let derived: Vec<&Assignment> = repo.all().iter().filter(|a| a.is_derived()).collect();
        serde_json::to_string(&derived).unwrap()
    }

    #[test]
    fn test_open_empty_store_derives() {
        let repo = open_repo();
        assert_eq!(repo.len(), 2);
        assert!(repo.all().iter().all(Assignment::is_derived));
        // The seed was written through.
        let raw = repo.store().get("timeline.assignments").unwrap();
        assert_eq!(Snapshot::decode(raw).unwrap().assignments.len(), 2);
    }

    #[test]
    fn test_open_existing_snapshot_skips_derivation() {
        let mut first = open_repo();
        first
            .create(AssignmentInput::new("proj-b", date(2023, 7, 10)).with_employee("e1"))
            .unwrap();
        let store = first.store().clone();

        let repo =
            AssignmentRepository::open(store, TimelineConfig::default(), &[], &employees()).unwrap();
        assert_eq!(repo.len(), 3);
    }

    #[test]
    fn test_open_refuses_newer_snapshot() {
        let store = MemoryStore::new().with_entry(
            "timeline.assignments",
            r#"{"version":9,"assignments":[]}"#,
        );
        let err = AssignmentRepository::open(store, TimelineConfig::default(), &plan_items(), &[])
            .unwrap_err();
        assert!(matches!(
            err,
            TimelineError::Storage(StorageError::UnsupportedVersion { found: 9, .. })
        ));
    }

    #[test]
    fn test_create_fills_defaults() {
        let mut repo = open_repo();
        let created = repo
            .create(AssignmentInput::new("proj-b", date(2023, 7, 10)))
            .unwrap();

        assert!(created.id.starts_with("manual-"));
        assert_eq!(created.employee_id, UNASSIGNED);
        assert_eq!(created.end_date, date(2023, 7, 10));
        assert_eq!((created.start_time, created.end_time), (time(8, 0), time(17, 0)));
        assert_eq!(created.color, color_for("proj-b"));
        assert_eq!(created.origin, AssignmentOrigin::Manual);
        assert_eq!(repo.get(&created.id), Some(&created));
    }

    #[test]
    fn test_create_rejects_times_with_seconds() {
        let mut repo = open_repo();
        let before = repo.len();
        let err = repo
            .create(AssignmentInput::new("proj-b", date(2023, 7, 10)).with_times(
                NaiveTime::from_hms_opt(8, 0, 10).unwrap(),
                NaiveTime::from_hms_opt(8, 0, 50).unwrap(),
            ))
            .unwrap_err();
        assert!(err
            .validation_errors()
            .unwrap()
            .iter()
            .all(|e| e.kind == ValidationErrorKind::InvalidTime));
        assert_eq!(repo.len(), before);
    }

    #[test]
    fn test_reopen_preserves_assignment_values() {
        let mut first = open_repo();
        let created = first
            .create(
                AssignmentInput::new("proj-b", date(2023, 7, 10))
                    .with_employee("e1")
                    .with_times(time(8, 0), time(8, 15)),
            )
            .unwrap();
        let store = first.store().clone();

        let reopened =
            AssignmentRepository::open(store, TimelineConfig::default(), &[], &employees()).unwrap();
        let reloaded = reopened.get(&created.id).unwrap();
        assert_eq!(reloaded, &created);
        assert!(reloaded.start_time < reloaded.end_time);
        assert_eq!(reopened.all(), first.all());
    }

    #[test]
    fn test_create_keeps_explicit_color() {
        let mut repo = open_repo();
        let created = repo
            .create(AssignmentInput::new("proj-b", date(2023, 7, 10)).with_color("#000000"))
            .unwrap();
        assert_eq!(created.color, "#000000");
    }

    #[test]
    fn test_create_validation_errors() {
        let mut repo = open_repo();
        let before = repo.len();

        let err = repo
            .create(AssignmentInput::new("", date(2023, 7, 10)))
            .unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap()[0].kind,
            ValidationErrorKind::MissingProject
        );

        let err = repo
            .create(AssignmentInput {
                project_id: "proj-b".into(),
                ..AssignmentInput::default()
            })
            .unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap()[0].kind,
            ValidationErrorKind::MissingStartDate
        );

        let err = repo
            .create(AssignmentInput::new("proj-b", date(2023, 7, 10)).with_employee(""))
            .unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap()[0].kind,
            ValidationErrorKind::MissingEmployee
        );

        assert_eq!(repo.len(), before);
    }

    #[test]
    fn test_create_checks_references() {
        let mut repo = open_repo();
        repo.set_references(References::from_records(
            &[Project::new("proj-a", "Roof")],
            &employees(),
        ));

        assert!(repo
            .create(AssignmentInput::new("proj-a", date(2023, 7, 10)).with_employee("e2"))
            .is_ok());
        let err = repo
            .create(AssignmentInput::new("proj-z", date(2023, 7, 10)).with_employee("e9"))
            .unwrap_err();
        assert_eq!(err.validation_errors().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut repo = open_repo();
        let created = repo
            .create(AssignmentInput::new("proj-b", date(2023, 7, 10)))
            .unwrap();
        assert!(repo.delete(&created.id));
        assert!(!repo.delete(&created.id));
        assert!(!repo.delete("never-existed"));
        assert!(repo.get(&created.id).is_none());
    }

    #[test]
    fn test_list_filters() {
        let mut repo = open_repo();
        repo.create(
            AssignmentInput::new("proj-b", date(2023, 7, 20))
                .with_end_date(date(2023, 7, 21))
                .with_employee("e1"),
        )
        .unwrap();

        assert_eq!(repo.list(&AssignmentFilter::new()).len(), 3);
        assert_eq!(repo.list(&AssignmentFilter::new().with_employee("e1")).len(), 2);
        assert_eq!(
            repo.list(&AssignmentFilter::new().with_origin(AssignmentOrigin::Manual))
                .len(),
            1
        );

        let week = DateRange::new(date(2023, 7, 5), date(2023, 7, 6));
        let ids: Vec<&str> = repo
            .list(&AssignmentFilter::new().with_date_range(week))
            .into_iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["plan-1", "plan-2"]);

        let filter = AssignmentFilter::new()
            .with_employee("e1")
            .with_date_range(DateRange::single(date(2023, 7, 21)))
            .with_project("proj-b");
        assert_eq!(repo.list(&filter).len(), 1);
    }

    #[test]
    fn test_create_visible_to_next_list() {
        let mut repo = open_repo();
        let created = repo
            .create(AssignmentInput::new("proj-b", date(2023, 7, 10)).with_employee("e2"))
            .unwrap();
        let listed = repo.list(&AssignmentFilter::new().with_employee("e2"));
        assert!(listed.iter().any(|a| a.id == created.id));
    }

    #[test]
    fn test_sync_is_idempotent() {
        let mut repo = open_repo();
        repo.create(AssignmentInput::new("proj-b", date(2023, 7, 10)))
            .unwrap();

        let first = derived_json(&repo);
        let report = repo.sync_derived(&plan_items(), &employees());
        assert_eq!(derived_json(&repo), first);
        assert!(!report.has_changes());
        assert_eq!(report.unchanged, 2);
        assert_eq!(repo.len(), 3);

        repo.sync_derived(&plan_items(), &employees());
        assert_eq!(derived_json(&repo), first);
        assert_eq!(repo.len(), 3);
    }

    #[test]
    fn test_sync_removes_only_dropped_plan_item() {
        let mut repo = open_repo();
        let manual = repo
            .create(AssignmentInput::new("proj-b", date(2023, 7, 10)).with_employee("e1"))
            .unwrap();
        let kept_derived = repo.get("plan-1").cloned().unwrap();

        let remaining = vec![plan_items().remove(0)];
        let report = repo.sync_derived(&remaining, &employees());

        assert_eq!(report.removed, vec!["plan-2".to_string()]);
        assert!(report.added.is_empty());
        assert_eq!(repo.len(), 2);
        assert!(repo.get("plan-2").is_none());
        assert_eq!(repo.get("plan-1"), Some(&kept_derived));
        assert_eq!(repo.get(&manual.id), Some(&manual));
        assert_eq!(
            repo.list(&AssignmentFilter::new().with_origin(AssignmentOrigin::Derived))
                .len(),
            1
        );
    }

    #[test]
    fn test_sync_reports_updates_and_additions() {
        let mut repo = open_repo();
        let mut items = plan_items();
        items[0].title = "Scaffolding (revised)".into();
        items.push(PlanItem::new("3", "proj-c", date(2023, 7, 7)));

        let report = repo.sync_derived(&items, &employees());
        assert_eq!(report.updated, vec!["plan-1".to_string()]);
        assert_eq!(report.added, vec!["plan-3".to_string()]);
        assert_eq!(report.unchanged, 1);
        assert_eq!(
            repo.get("plan-1").and_then(|a| a.title.as_deref()),
            Some("Scaffolding (revised)")
        );
    }

    #[test]
    fn test_move_keeps_length() {
        let mut repo = open_repo();
        let created = repo
            .create(
                AssignmentInput::new("proj-b", date(2023, 7, 10))
                    .with_end_date(date(2023, 7, 12))
                    .with_employee("e1"),
            )
            .unwrap();

        let moved = repo
            .move_assignment(&created.id, "e2", date(2023, 7, 30))
            .unwrap();
        assert_eq!(moved.id, created.id);
        assert_eq!(moved.employee_id, "e2");
        assert_eq!(moved.start_date, date(2023, 7, 30));
        assert_eq!(moved.end_date, date(2023, 8, 1));
        assert_eq!(moved.start_time, created.start_time);
        assert_eq!(repo.get(&created.id), Some(&moved));
    }

    #[test]
    fn test_move_and_resize_errors() {
        let mut repo = open_repo();
        let err = repo
            .move_assignment("missing", "e1", date(2023, 7, 1))
            .unwrap_err();
        assert!(matches!(err, TimelineError::Reference { .. }));

        let err = repo
            .move_assignment("plan-1", "e2", date(2023, 7, 1))
            .unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap()[0].kind,
            ValidationErrorKind::DerivedReadOnly
        );

        let created = repo
            .create(AssignmentInput::new("proj-b", date(2023, 7, 10)))
            .unwrap();
        let err = repo
            .move_assignment(&created.id, "", date(2023, 7, 11))
            .unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap()[0].kind,
            ValidationErrorKind::MissingEmployee
        );
        let err = repo
            .resize_assignment(&created.id, date(2023, 7, 10), date(2023, 7, 9))
            .unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap()[0].kind,
            ValidationErrorKind::InvalidDateRange
        );
        assert_eq!(repo.get(&created.id), Some(&created));
    }

    #[test]
    fn test_resize() {
        let mut repo = open_repo();
        let created = repo
            .create(AssignmentInput::new("proj-b", date(2023, 7, 10)))
            .unwrap();
        let resized = repo
            .resize_assignment(&created.id, date(2023, 7, 9), date(2023, 7, 14))
            .unwrap();
        assert_eq!(resized.duration_days(), 6);
    }

    #[test]
    fn test_storage_failure_keeps_state_and_retries() {
        let mut repo = AssignmentRepository::open(
            FlakyStore::default(),
            TimelineConfig::default(),
            &plan_items(),
            &employees(),
        )
        .unwrap();
        assert_eq!(repo.store().writes, 1);

        repo.store_mut().failing = true;
        let created = repo
            .create(AssignmentInput::new("proj-b", date(2023, 7, 10)))
            .unwrap();
        assert!(repo.has_pending_write());
        assert!(repo.get(&created.id).is_some());
        assert!(repo.flush().is_err());

        repo.store_mut().failing = false;
        repo.delete("no-such-id");
        assert!(!repo.has_pending_write());
        let raw = repo.store().inner.get("timeline.assignments").unwrap();
        let stored = Snapshot::decode(raw).unwrap();
        assert!(stored.assignments.iter().any(|a| a.id == created.id));
    }

    #[test]
    fn test_custom_storage_key() {
        let repo = AssignmentRepository::open(
            MemoryStore::new(),
            TimelineConfig::default().with_storage_key("tenant-7/user-3"),
            &plan_items(),
            &[],
        )
        .unwrap();
        assert!(repo.store().get("tenant-7/user-3").is_some());
        assert!(repo.store().get("timeline.assignments").is_none());
    }
}
