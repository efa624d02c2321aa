//! Calendar arithmetic for the timeline views.
//!
//! - **`range`**: visible date window and navigation per zoom level
//! - **`weeks`**: ISO-week buckets for "KW n" header rendering
//! - **`visibility`**: date-only containment check for multi-day views
//!
//! All functions here are pure.

mod range;
mod visibility;
mod weeks;

pub use range::{navigate, resolve_range, week_start, Direction};
pub use visibility::{is_visible_on_day, visible_on_day};
pub use weeks::{days_in_range, group_by_iso_week, WeekGroup};
