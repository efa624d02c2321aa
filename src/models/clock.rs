//! Time-of-day helpers.
//!
//! Assignment times travel as `HH:MM` strings (the slot grid labels), but are
//! held as [`NaiveTime`] so comparisons and arithmetic are typed. Stored
//! times are always whole minutes: the wire format has no seconds.

use chrono::{NaiveTime, Timelike};

use crate::validation::{ValidationError, ValidationErrorKind};

const FORMAT: &str = "%H:%M";

/// Parses an `HH:MM` string. Seconds are rejected.
pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), FORMAT).map_err(|_| {
        ValidationError::new(
            ValidationErrorKind::InvalidTime,
            format!("'{value}' is not a HH:MM time of day"),
        )
    })
}

/// Formats a time as `HH:MM`.
pub fn format_time(time: NaiveTime) -> String {
    time.format(FORMAT).to_string()
}

/// Drops seconds and sub-second precision.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Whether `time` survives an `HH:MM` round trip unchanged.
pub fn is_whole_minute(time: NaiveTime) -> bool {
    time.second() == 0 && time.nanosecond() == 0
}

/// `serde(with)` adapter for `HH:MM` times.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        // Older snapshots may carry seconds; they are dropped.
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map(super::truncate_to_minute)
            .map_err(de::Error::custom)
    }
}

/// `serde(with)` adapter for optional `HH:MM` times.
pub mod hhmm_opt {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_some(&super::format_time(*t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveTime::parse_from_str(s, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
                .map(|t| Some(super::truncate_to_minute(t)))
                .map_err(de::Error::custom),
        }
    }
}
