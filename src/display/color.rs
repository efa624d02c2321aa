//! Project color assignment.
//!
//! The color is a pure function of the project id's last character, so it
//! is stable across calls, processes and machines. Different projects may
//! share a color; it is a grouping aid, not an identifier.

/// Fixed six-entry palette (blue, green, amber, red, violet, pink).
pub const PALETTE: [&str; 6] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899",
];

/// Color for a project id.
///
/// Uses the Unicode scalar value of the last character modulo the palette
/// size. An empty id maps to the first entry.
pub fn color_for(project_id: &str) -> &'static str {
    let index = project_id
        .chars()
        .next_back()
        .map(|c| c as usize % PALETTE.len())
        .unwrap_or(0);
    PALETTE[index]
}
