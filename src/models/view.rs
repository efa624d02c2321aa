//! View state: zoom level, anchor date, and inclusive date ranges.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Size of the visible date window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoomLevel {
    /// A single day with time-of-day slots.
    Day,
    /// One ISO week.
    #[default]
    Week,
    /// Two weeks from the ISO week start.
    TwoWeek,
    /// Four weeks from the ISO week start.
    FourWeek,
    /// One calendar month.
    Month,
}

impl ZoomLevel {
    /// All zoom levels, finest first.
    pub const ALL: [ZoomLevel; 5] = [
        ZoomLevel::Day,
        ZoomLevel::Week,
        ZoomLevel::TwoWeek,
        ZoomLevel::FourWeek,
        ZoomLevel::Month,
    ];

    /// Stable identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            ZoomLevel::Day => "day",
            ZoomLevel::Week => "week",
            ZoomLevel::TwoWeek => "twoWeek",
            ZoomLevel::FourWeek => "fourWeek",
            ZoomLevel::Month => "month",
        }
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoomLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "day" => Ok(ZoomLevel::Day),
            "week" => Ok(ZoomLevel::Week),
            "twoweek" | "2week" => Ok(ZoomLevel::TwoWeek),
            "fourweek" | "4week" => Ok(ZoomLevel::FourWeek),
            "month" => Ok(ZoomLevel::Month),
            other => Err(format!("unknown zoom level '{other}'")),
        }
    }
}

/// An inclusive calendar date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range; arguments are swapped if given out of order.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    /// A one-day range.
    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// Whether `day` lies within the range (both ends inclusive).
    #[inline]
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    /// Whether two ranges share at least one day.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Number of days covered.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Iterates every day in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start
            .iter_days()
            .take_while(move |d| *d <= end)
    }

    /// The range shifted by whole days (negative = earlier).
    pub fn shifted(&self, days: i64) -> Option<Self> {
        Some(Self {
            start: shift_days(self.start, days)?,
            end: shift_days(self.end, days)?,
        })
    }
}

pub(crate) fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
}

/// The UI's current zoom and anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub zoom: ZoomLevel,
    pub anchor: NaiveDate,
}

impl ViewState {
    /// Creates a view state.
    pub fn new(zoom: ZoomLevel, anchor: NaiveDate) -> Self {
        Self { zoom, anchor }
    }

    /// Visible range for this state.
    pub fn range(&self) -> DateRange {
        crate::calendar::resolve_range(self.zoom, self.anchor)
    }
}
