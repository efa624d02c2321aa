//! Resource timeline scheduling.
//!
//! Plans work as assignments of employees to projects over calendar days and
//! daily time windows. Assignments come from two sources: derived ones
//! mirror upstream plan items, manual ones are created in the timeline.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Assignment`, `PlanItem`, `Employee`,
//!   `Project`, `ViewState`, `ZoomLevel`, `DateRange`
//! - **`calendar`**: View ranges, navigation, ISO week grouping, visibility
//! - **`display`**: Project colors and label truncation
//! - **`layout`**: Time-slot grid and single-day occupancy layout
//! - **`repository`**: Persisted assignment collection and derived sync
//! - **`scheduler`**: `TimelineScheduler` facade and workload reporting
//! - **`validation`**: Input integrity checks (references, date and time ranges)
//! - **`config`**, **`error`**: Settings and error types
//!
//! # Architecture
//!
//! The scheduler is constructed once by the caller and owns all state.
//! Persistence goes through the [`KeyValueStore`](repository::KeyValueStore)
//! trait; [`MemoryStore`](repository::MemoryStore) and
//! [`FileStore`](repository::FileStore) are provided.
//!
//! # References
//!
//! - ISO 8601:2004, §3.2.2 "Calendar week" (week numbering)

pub mod calendar;
pub mod config;
pub mod display;
pub mod error;
pub mod layout;
pub mod models;
pub mod repository;
pub mod scheduler;
pub mod validation;

pub use config::TimelineConfig;
pub use error::{StorageError, TimelineError, TimelineResult};
pub use scheduler::TimelineScheduler;
