//! View range resolution and navigation.
//!
//! # Windows
//!
//! | Zoom | Start | End | Step |
//! |------|-------|-----|------|
//! | Day | anchor | anchor | 1 day |
//! | Week | ISO week Monday | Monday + 6 | 7 days |
//! | TwoWeek | ISO week Monday | Monday + 13 | 14 days |
//! | FourWeek | ISO week Monday | Monday + 27 | 28 days |
//! | Month | 1st of month | last of month | 1 month |
//!
//! Month steps clamp to the last valid day (Jan 31 → Feb 28). This is the
//! one exception to the rule that `navigate(Prev, navigate(Next, a)) == a`:
//! months differ in length, so no month step can invert exactly for days
//! 29–31. For those anchors only the visible month survives the round trip;
//! every other zoom level and every anchor on days 1–28 round-trips exactly.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{shift_days, DateRange, ZoomLevel};

/// Navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = i64::from(date.weekday().num_days_from_monday());
    shift_days(date, -offset).unwrap_or(NaiveDate::MIN)
}

/// Computes the inclusive visible range for a zoom level and anchor.
pub fn resolve_range(zoom: ZoomLevel, anchor: NaiveDate) -> DateRange {
    match zoom {
        ZoomLevel::Day => DateRange::single(anchor),
        ZoomLevel::Week => weeks_from_monday(anchor, 1),
        ZoomLevel::TwoWeek => weeks_from_monday(anchor, 2),
        ZoomLevel::FourWeek => weeks_from_monday(anchor, 4),
        ZoomLevel::Month => month_of(anchor),
    }
}

/// Moves the anchor by one unit of the zoom level.
pub fn navigate(direction: Direction, zoom: ZoomLevel, anchor: NaiveDate) -> NaiveDate {
    let moved = match zoom {
        ZoomLevel::Month => {
            let one = Months::new(1);
            match direction {
                Direction::Next => anchor.checked_add_months(one),
                Direction::Prev => anchor.checked_sub_months(one),
            }
        }
        _ => {
            let step = step_days(zoom);
            match direction {
                Direction::Next => shift_days(anchor, step),
                Direction::Prev => shift_days(anchor, -step),
            }
        }
    };
    // Outside chrono's representable range the anchor stays put.
    moved.unwrap_or(anchor)
}

fn step_days(zoom: ZoomLevel) -> i64 {
    match zoom {
        ZoomLevel::Day => 1,
        ZoomLevel::Week => 7,
        ZoomLevel::TwoWeek => 14,
        ZoomLevel::FourWeek => 28,
        // Not day-based; handled by calendar-month arithmetic.
        ZoomLevel::Month => 0,
    }
}

fn weeks_from_monday(anchor: NaiveDate, weeks: i64) -> DateRange {
    let start = week_start(anchor);
    let end = shift_days(start, weeks * 7 - 1).unwrap_or(NaiveDate::MAX);
    DateRange::new(start, end)
}

fn month_of(anchor: NaiveDate) -> DateRange {
    let first = anchor.with_day(1).unwrap_or(anchor);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    DateRange::new(first, last)
}
