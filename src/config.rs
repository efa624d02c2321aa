//! Timeline configuration.
//!
//! All fields have defaults, so an empty JSON object is a valid config.
//!
//! | Field | Default |
//! |-------|---------|
//! | `dayStartHour` | 7 |
//! | `dayEndHour` | 18 |
//! | `slotMinutes` | 30 |
//! | `defaultStartTime` | 08:00 |
//! | `defaultEndTime` | 17:00 |
//! | `storageKey` | `timeline.assignments` |
//! | `defaultZoom` | `week` |

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};
use crate::layout::SlotGrid;
use crate::models::{hhmm, is_whole_minute, ZoomLevel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineConfig {
    /// First slot of the single-day grid (hour, inclusive).
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,
    /// Last slot of the single-day grid (hour, inclusive).
    #[serde(default = "default_day_end_hour")]
    pub day_end_hour: u32,
    /// Slot increment in minutes. Must divide 60.
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    /// Start time used when an assignment or plan item has none.
    #[serde(default = "default_start_time", with = "hhmm")]
    pub default_start_time: NaiveTime,
    /// End time used when an assignment or plan item has none.
    #[serde(default = "default_end_time", with = "hhmm")]
    pub default_end_time: NaiveTime,
    /// Key of the assignment snapshot in the durable store.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Zoom level a fresh view starts in.
    #[serde(default)]
    pub default_zoom: ZoomLevel,
}

fn default_day_start_hour() -> u32 {
    7
}
fn default_day_end_hour() -> u32 {
    18
}
fn default_slot_minutes() -> u32 {
    30
}
fn default_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN)
}
fn default_end_time() -> NaiveTime {
    NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN)
}
fn default_storage_key() -> String {
    "timeline.assignments".to_string()
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            day_start_hour: default_day_start_hour(),
            day_end_hour: default_day_end_hour(),
            slot_minutes: default_slot_minutes(),
            default_start_time: default_start_time(),
            default_end_time: default_end_time(),
            storage_key: default_storage_key(),
            default_zoom: ZoomLevel::default(),
        }
    }
}

impl TimelineConfig {
    /// Parses a JSON config and validates it.
    pub fn from_json(raw: &str) -> TimelineResult<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| TimelineError::Config(format!("Invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the single-day grid.
    pub fn with_slot_grid(mut self, start_hour: u32, end_hour: u32, slot_minutes: u32) -> Self {
        self.day_start_hour = start_hour;
        self.day_end_hour = end_hour;
        self.slot_minutes = slot_minutes;
        self
    }

    /// Sets the default daily time window.
    pub fn with_default_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.default_start_time = start;
        self.default_end_time = end;
        self
    }

    /// Sets the storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Sets the initial zoom level.
    pub fn with_default_zoom(mut self, zoom: ZoomLevel) -> Self {
        self.default_zoom = zoom;
        self
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> TimelineResult<()> {
        if self.day_start_hour >= self.day_end_hour || self.day_end_hour > 23 {
            return Err(TimelineError::Config(format!(
                "Day grid {}..{} must satisfy start < end <= 23",
                self.day_start_hour, self.day_end_hour
            )));
        }
        if self.slot_minutes == 0 || 60 % self.slot_minutes != 0 {
            return Err(TimelineError::Config(format!(
                "Slot increment of {} minutes does not divide an hour",
                self.slot_minutes
            )));
        }
        if !is_whole_minute(self.default_start_time) || !is_whole_minute(self.default_end_time) {
            return Err(TimelineError::Config(
                "Default times must be whole minutes".to_string(),
            ));
        }
        if self.default_start_time >= self.default_end_time {
            return Err(TimelineError::Config(
                "Default start time must be before default end time".to_string(),
            ));
        }
        if self.storage_key.trim().is_empty() {
            return Err(TimelineError::Config("Storage key is empty".to_string()));
        }
        Ok(())
    }

    /// The single-day slot grid described by this config.
    pub fn slot_grid(&self) -> SlotGrid {
        SlotGrid::new(self.day_start_hour, self.day_end_hour, self.slot_minutes)
    }
}
