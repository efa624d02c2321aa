//! Deterministic presentation helpers.
//!
//! - **`color`**: project color from a fixed palette
//! - **`label`**: per-zoom label truncation

mod color;
mod label;

pub use color::{color_for, PALETTE};
pub use label::{label_budget, truncate, ELLIPSIS};
