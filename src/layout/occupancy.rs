//! Slot occupancy layout for one employee and one day.
//!
//! # Algorithm
//!
//! For each assignment, in input order:
//! 1. `start = index_of(start_time)`, `end = index_of(end_time)`.
//! 2. If either time is not on the grid, or `end <= start`, the assignment is
//!    omitted and a [`RenderabilityWarning`] is recorded.
//! 3. Otherwise the assignment anchors at `start` with `span = end - start`,
//!    and slots `start+1 .. end` are marked covered.
//!
//! The end slot itself is not covered: an assignment ending at 10:00 leaves
//! the 10:00 slot free. A slot that anchors anything stays an anchor even if
//! another assignment also covers it.
//!
//! Overlapping assignments are not detected; each is placed independently
//! and the UI may draw them on top of each other.
//!
//! # Complexity
//! O(n log s + Σ span) for n assignments on s slots.

use std::fmt;

use chrono::NaiveTime;
use serde::Serialize;
use tracing::warn;

use super::SlotGrid;
use crate::models::{format_time, Assignment};

/// An assignment anchored at a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
    pub assignment: &'a Assignment,
    /// Width in slots (`>= 1`).
    pub span: usize,
}

/// State of one slot in the day grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlotCell<'a> {
    /// Nothing starts or runs here.
    #[default]
    Empty,
    /// One or more assignments start here and are drawn from this slot.
    Anchor(Vec<Placement<'a>>),
    /// Spanned by an assignment anchored earlier; not drawn again.
    Covered,
}

impl SlotCell<'_> {
    pub fn is_anchor(&self) -> bool {
        matches!(self, SlotCell::Anchor(_))
    }

    pub fn is_covered(&self) -> bool {
        matches!(self, SlotCell::Covered)
    }
}

/// Why an assignment could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "time", rename_all = "camelCase")]
pub enum RenderabilityIssue {
    /// Start time is not one of the slot labels.
    StartNotOnGrid(#[serde(serialize_with = "serialize_hhmm")] NaiveTime),
    /// End time is not one of the slot labels.
    EndNotOnGrid(#[serde(serialize_with = "serialize_hhmm")] NaiveTime),
    /// End slot is not after the start slot.
    EmptySpan,
}

fn serialize_hhmm<S: serde::Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    crate::models::hhmm::serialize(time, serializer)
}

/// Non-fatal notice that an assignment was left out of a day layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderabilityWarning {
    pub assignment_id: String,
    pub issue: RenderabilityIssue,
}

impl fmt::Display for RenderabilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issue {
            RenderabilityIssue::StartNotOnGrid(t) => write!(
                f,
                "assignment '{}' starts at {} which is not on the slot grid",
                self.assignment_id,
                format_time(t)
            ),
            RenderabilityIssue::EndNotOnGrid(t) => write!(
                f,
                "assignment '{}' ends at {} which is not on the slot grid",
                self.assignment_id,
                format_time(t)
            ),
            RenderabilityIssue::EmptySpan => write!(
                f,
                "assignment '{}' spans no slots",
                self.assignment_id
            ),
        }
    }
}

/// Layout of one day: one cell per slot plus omitted-assignment warnings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayLayout<'a> {
    pub cells: Vec<SlotCell<'a>>,
    pub warnings: Vec<RenderabilityWarning>,
}

impl<'a> DayLayout<'a> {
    /// Placements anchored at `index` (empty if none).
    pub fn anchors_at(&self, index: usize) -> &[Placement<'a>] {
        match self.cells.get(index) {
            Some(SlotCell::Anchor(placements)) => placements.as_slice(),
            _ => &[],
        }
    }

    /// All placements with their anchor slot index, in slot order.
    pub fn placements(&self) -> impl Iterator<Item = (usize, &Placement<'a>)> + '_ {
        self.cells.iter().enumerate().flat_map(|(index, cell)| {
            let placements: &[Placement<'a>] = match cell {
                SlotCell::Anchor(p) => p.as_slice(),
                _ => &[],
            };
            placements.iter().map(move |p| (index, p))
        })
    }

    /// Number of assignments drawn.
    pub fn rendered_count(&self) -> usize {
        self.placements().count()
    }
}

/// Lays out one employee's assignments for one day onto `grid`.
///
/// Callers pass only assignments that touch the day (see
/// [`is_visible_on_day`](crate::calendar::is_visible_on_day)).
pub fn layout_day<'a>(grid: &SlotGrid, assignments: &[&'a Assignment]) -> DayLayout<'a> {
    let mut cells: Vec<SlotCell<'a>> = vec![SlotCell::Empty; grid.len()];
    let mut warnings = Vec::new();

    for &assignment in assignments {
        let (start, end) = match slot_bounds(grid, assignment) {
            Ok(bounds) => bounds,
            Err(issue) => {
                let warning = RenderabilityWarning {
                    assignment_id: assignment.id.clone(),
                    issue,
                };
                warn!(assignment_id = %assignment.id, "{warning}");
                warnings.push(warning);
                continue;
            }
        };

        let placement = Placement {
            assignment,
            span: end - start,
        };
        match &mut cells[start] {
            SlotCell::Anchor(placements) => placements.push(placement),
            cell => *cell = SlotCell::Anchor(vec![placement]),
        }

        for cell in &mut cells[start + 1..end] {
            if !cell.is_anchor() {
                *cell = SlotCell::Covered;
            }
        }
    }

    DayLayout { cells, warnings }
}

fn slot_bounds(grid: &SlotGrid, assignment: &Assignment) -> Result<(usize, usize), RenderabilityIssue> {
    let start = grid
        .index_of(assignment.start_time)
        .ok_or(RenderabilityIssue::StartNotOnGrid(assignment.start_time))?;
    let end = grid
        .index_of(assignment.end_time)
        .ok_or(RenderabilityIssue::EndNotOnGrid(assignment.end_time))?;
    if end <= start {
        return Err(RenderabilityIssue::EmptySpan);
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssignmentOrigin;
    use chrono::NaiveDate;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn assignment(id: &str, start: NaiveTime, end: NaiveTime) -> Assignment {
        let day = NaiveDate::from_ymd_opt(2023, 7, 3).unwrap();
        Assignment {
            id: id.into(),
            project_id: "p1".into(),
            employee_id: "e1".into(),
            start_date: day,
            end_date: day,
            start_time: start,
            end_time: end,
            title: None,
            description: None,
            status: None,
            priority: None,
            color: "#3b82f6".into(),
            origin: AssignmentOrigin::Manual,
        }
    }

    #[test]
    fn test_aligned_assignment_anchor_and_span() {
        let grid = SlotGrid::new(7, 18, 30);
        let a = assignment("a1", time(8, 0), time(10, 0));
        let layout = layout_day(&grid, &[&a]);

        assert!(layout.warnings.is_empty());
        assert_eq!(layout.cells.len(), 23);
        let anchors = layout.anchors_at(2);
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].span, 4);
        assert_eq!(anchors[0].assignment.id, "a1");
        assert!(layout.cells[3].is_covered());
        assert!(layout.cells[4].is_covered());
        assert!(layout.cells[5].is_covered());
        assert_eq!(layout.cells[6], SlotCell::Empty);
        assert_eq!(layout.cells[1], SlotCell::Empty);
    }

    #[test]
    fn test_misaligned_assignment_omitted_with_warning() {
        let grid = SlotGrid::new(7, 18, 30);
        let a = assignment("a2", time(8, 15), time(9, 0));
        let layout = layout_day(&grid, &[&a]);

        assert_eq!(layout.rendered_count(), 0);
        assert!(layout.cells.iter().all(|c| *c == SlotCell::Empty));
        assert_eq!(
            layout.warnings,
            vec![RenderabilityWarning {
                assignment_id: "a2".into(),
                issue: RenderabilityIssue::StartNotOnGrid(time(8, 15)),
            }]
        );
        assert!(layout.warnings[0].to_string().contains("08:15"));
    }

    #[test]
    fn test_seconds_past_slot_are_off_grid() {
        let grid = SlotGrid::new(7, 18, 30);
        let start = NaiveTime::from_hms_opt(8, 0, 30).unwrap();
        let a = assignment("a7", start, time(9, 0));
        let layout = layout_day(&grid, &[&a]);
        assert_eq!(layout.rendered_count(), 0);
        assert_eq!(layout.warnings[0].issue, RenderabilityIssue::StartNotOnGrid(start));
    }

    #[test]
    fn test_end_off_grid() {
        let grid = SlotGrid::new(7, 18, 30);
        let a = assignment("a3", time(17, 0), time(19, 0));
        let layout = layout_day(&grid, &[&a]);
        assert_eq!(layout.warnings[0].issue, RenderabilityIssue::EndNotOnGrid(time(19, 0)));
    }

    #[test]
    fn test_ending_at_last_label() {
        let grid = SlotGrid::new(7, 18, 30);
        let a = assignment("a4", time(17, 0), time(18, 0));
        let layout = layout_day(&grid, &[&a]);
        assert_eq!(layout.anchors_at(20)[0].span, 2);
        assert!(layout.cells[21].is_covered());
        assert_eq!(layout.cells[22], SlotCell::Empty);
    }

    #[test]
    fn test_overlaps_render_independently() {
        let grid = SlotGrid::new(7, 18, 30);
        let a = assignment("a1", time(8, 0), time(12, 0));
        let b = assignment("b1", time(9, 0), time(10, 0));
        let c = assignment("c1", time(8, 0), time(9, 0));
        let layout = layout_day(&grid, &[&a, &b, &c]);

        assert!(layout.warnings.is_empty());
        assert_eq!(layout.rendered_count(), 3);
        assert_eq!(layout.anchors_at(2).len(), 2); // a1 and c1 both start at 08:00
        assert!(layout.cells[4].is_anchor()); // b1 starts inside a1
        assert!(layout.cells[5].is_covered());

        let order: Vec<(usize, &str)> = layout
            .placements()
            .map(|(i, p)| (i, p.assignment.id.as_str()))
            .collect();
        assert_eq!(order, vec![(2, "a1"), (2, "c1"), (4, "b1")]);
    }

    #[test]
    fn test_empty_span_warning() {
        let grid = SlotGrid::new(7, 18, 30);
        let a = assignment("a5", time(10, 0), time(9, 0));
        let layout = layout_day(&grid, &[&a]);
        assert_eq!(layout.warnings[0].issue, RenderabilityIssue::EmptySpan);
    }

    #[test]
    fn test_coarser_grid_changes_alignment() {
        let grid = SlotGrid::new(7, 18, 60);
        let a = assignment("a6", time(8, 30), time(10, 0));
        let layout = layout_day(&grid, &[&a]);
        assert_eq!(layout.rendered_count(), 0);
        assert_eq!(layout.warnings.len(), 1);

        let fine = SlotGrid::new(7, 18, 15);
        let layout = layout_day(&fine, &[&a]);
        assert_eq!(layout.anchors_at(6)[0].span, 6);
    }

    #[test]
    fn test_warning_serializes() {
        let w = RenderabilityWarning {
            assignment_id: "a2".into(),
            issue: RenderabilityIssue::StartNotOnGrid(time(8, 15)),
        };
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["assignmentId"], "a2");
        assert_eq!(json["issue"]["kind"], "startNotOnGrid");
        assert_eq!(json["issue"]["time"], "08:15");
    }
}
