//! Label truncation per zoom level.
//!
//! Coarser zoom levels have narrower day columns, so project labels get a
//! tighter character budget.
//!
//! | Zoom | Budget |
//! |------|--------|
//! | Day | 30 |
//! | Week | 15 |
//! | TwoWeek | 10 |
//! | FourWeek | 8 |
//! | Month | 6 |

use crate::models::ZoomLevel;

/// Suffix appended to truncated labels.
pub const ELLIPSIS: &str = "...";

/// Maximum number of visible characters before the ellipsis.
pub fn label_budget(zoom: ZoomLevel) -> usize {
    match zoom {
        ZoomLevel::Day => 30,
        ZoomLevel::Week => 15,
        ZoomLevel::TwoWeek => 10,
        ZoomLevel::FourWeek => 8,
        ZoomLevel::Month => 6,
    }
}

/// Truncates `name` to the zoom level's budget.
///
/// Counts characters, not bytes, and never splits one. The result is at
/// most `label_budget(zoom) + 3` characters long.
pub fn truncate(name: &str, zoom: ZoomLevel) -> String {
    let budget = label_budget(zoom);
    match name.char_indices().nth(budget) {
        None => name.to_string(),
        Some((cut, _)) => format!("{}{ELLIPSIS}", &name[..cut]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_names_unchanged() {
        assert_eq!(truncate("Roof", ZoomLevel::Month), "Roof");
        assert_eq!(truncate("Kitchen", ZoomLevel::Week), "Kitchen");
        assert_eq!(truncate("", ZoomLevel::Month), "");
    }

    #[test]
    fn test_exact_budget_unchanged() {
        assert_eq!(truncate("abcdef", ZoomLevel::Month), "abcdef");
        assert_eq!(truncate("abcdefg", ZoomLevel::Month), "abcdef...");
    }

    #[test]
    fn test_budgets_tighten_with_zoom() {
        let name = "Renovation Schmidt Bathroom and Kitchen";
        assert_eq!(truncate(name, ZoomLevel::Week), "Renovation Schm...");
        assert_eq!(truncate(name, ZoomLevel::Month), "Renova...");
        for pair in ZoomLevel::ALL.windows(2) {
            assert!(label_budget(pair[0]) >= label_budget(pair[1]));
        }
    }

    #[test]
    fn test_length_bound_for_all_lengths() {
        for zoom in ZoomLevel::ALL {
            for len in 0..60 {
                let name = "x".repeat(len);
                let out = truncate(&name, zoom);
                assert!(out.chars().count() <= label_budget(zoom) + ELLIPSIS.len());
            }
        }
    }

    #[test]
    fn test_multibyte_not_split() {
        let out = truncate("Müllerstraße Überdachung", ZoomLevel::FourWeek);
        assert_eq!(out, "Müllerst...");
        assert_eq!(truncate("ääääääää", ZoomLevel::Month), "ääääää...");
    }
}
