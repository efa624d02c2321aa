//! Assignment persistence and synchronization.
//!
//! - **`store`**: durable key-value store trait, in-memory and file
//!   backends, and the versioned [`Snapshot`] blob
//! - **`derive`**: turning upstream plan items into derived assignments
//! - **`assignments`**: the [`AssignmentRepository`] that owns the collection
//!
//! # Consistency
//! The in-memory collection is authoritative for the running session. Every
//! mutation writes the full snapshot through to the store; a failed write is
//! logged and retried by the next mutation, never rolled back.

mod assignments;
mod derive;
mod store;

pub use assignments::{AssignmentFilter, AssignmentRepository, SyncReport};
pub use derive::{derive_assignments, derived_id, DERIVED_ID_PREFIX};
pub use store::{FileStore, KeyValueStore, MemoryStore, Snapshot, SNAPSHOT_VERSION};
