//! Time-of-day slot grid.
//!
//! The grid is an ordered list of slot start times from the first hour to the
//! last hour, both inclusive, at a fixed minute increment. The last label
//! exists so that an assignment can end exactly at the close of the day.

use chrono::NaiveTime;

use crate::models::{format_time, parse_time};
use crate::validation::ValidationError;

/// Ordered slot labels for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGrid {
    times: Vec<NaiveTime>,
}

impl SlotGrid {
    /// Creates a grid from `start_hour:00` to `end_hour:00` inclusive.
    ///
    /// A zero increment is treated as one minute. Hours past 23 are dropped.
    pub fn new(start_hour: u32, end_hour: u32, slot_minutes: u32) -> Self {
        let step = slot_minutes.max(1) as usize;
        let times = (start_hour * 60..=end_hour * 60)
            .step_by(step)
            .filter_map(|minute| NaiveTime::from_hms_opt(minute / 60, minute % 60, 0))
            .collect();
        Self { times }
    }

    /// Creates a grid from caller-supplied `HH:MM` labels.
    ///
    /// Labels must be strictly increasing.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self, ValidationError> {
        let mut times = Vec::with_capacity(labels.len());
        for label in labels {
            let time = parse_time(label.as_ref())?;
            if times.last().is_some_and(|prev| *prev >= time) {
                return Err(ValidationError::new(
                    crate::validation::ValidationErrorKind::InvalidTimeRange,
                    format!("Slot label '{}' is not after its predecessor", label.as_ref()),
                ));
            }
            times.push(time);
        }
        Ok(Self { times })
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the grid has no slots.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Slot start times in order.
    pub fn times(&self) -> &[NaiveTime] {
        &self.times
    }

    /// Slot labels as `HH:MM` strings.
    pub fn labels(&self) -> Vec<String> {
        self.times.iter().copied().map(format_time).collect()
    }

    /// Index of the slot starting exactly at `time`.
    ///
    /// Anything between two slots, including a few seconds past one, has no
    /// index.
    pub fn index_of(&self, time: NaiveTime) -> Option<usize> {
        self.times.binary_search(&time).ok()
    }
}
