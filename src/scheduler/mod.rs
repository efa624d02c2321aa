//! Timeline scheduler facade and workload reporting.
//!
//! [`TimelineScheduler`] is the single entry point a UI talks to. It owns
//! the view state, the assignment repository and the reference data, and
//! forwards every command to the module that implements it.
//!
//! [`WorkloadReport`] summarizes per-employee load for the visible range
//! and lists double bookings without preventing them.

mod facade;
mod workload;

pub use facade::{DayChips, EmployeeRow, TimelineScheduler, UNASSIGNED_ROW_NAME};
pub use workload::{EmployeeWorkload, Overlap, WorkloadReport};
