//! Single-day slot layout.
//!
//! - **`slots`**: the time-of-day grid ([`SlotGrid`])
//! - **`occupancy`**: placing assignments onto the grid ([`layout_day`])
//!
//! Multi-day views do not use this module; they only need the
//! [visibility predicate](crate::calendar::is_visible_on_day).

mod occupancy;
mod slots;

pub use occupancy::{layout_day, DayLayout, Placement, RenderabilityIssue, RenderabilityWarning, SlotCell};
pub use slots::SlotGrid;
