//! Timeline domain models.
//!
//! Provides the data types shared by every timeline component: the owned
//! [`Assignment`] collection, the read-only upstream records it is derived
//! from, and the view state that selects a visible date window.
//!
//! # Ownership
//!
//! | Type | Owner | Mutated here |
//! |------|-------|--------------|
//! | `Assignment` | this crate | yes |
//! | `PlanItem` | planning module | no |
//! | `Employee` | team administration | no |
//! | `Project` | project administration | no |
//! | `ViewState` | consuming UI | via facade |

mod assignment;
mod clock;
mod plan;
mod view;

pub use assignment::{Assignment, AssignmentInput, AssignmentOrigin, UNASSIGNED};
pub use clock::{format_time, hhmm, hhmm_opt, is_whole_minute, parse_time, truncate_to_minute};
pub use plan::{Employee, PlanItem, Project};
pub use view::{DateRange, ViewState, ZoomLevel};

pub(crate) use view::shift_days;
