//! Date, time-of-day and duration conversions for schedule records.
//!
//! Bootstrap data carries dates, start times and lengths as loosely formatted
//! strings. These helpers turn them into `chrono` values and back.

use chrono::{NaiveDate, NaiveTime, TimeDelta};

/// Accepted start-time layouts, tried in order.
const TIME_FORMATS: [&str; 3] = ["%H:%M", "%H:%M:%S", "%H:%M:%S%.f"];

/// Error raised when a date, time or length field cannot be converted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("invalid start time '{value}': expected HH:MM or HH:MM:SS")]
    InvalidTime { value: String },

    #[error("invalid length '{value}': expected a finite, non-negative number of minutes")]
    InvalidLength { value: String },
}

/// Parse an ISO-8601 calendar date (`2016-06-01`).
pub fn parse_date(value: &str) -> Result<NaiveDate, TimeParseError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| TimeParseError::InvalidDate {
        value: value.to_string(),
    })
}

/// Parse a time of day, with or without seconds (`09:00`, `09:00:30`).
pub fn parse_time(value: &str) -> Result<NaiveTime, TimeParseError> {
    let trimmed = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| TimeParseError::InvalidTime {
            value: value.to_string(),
        })
}

/// Convert a decimal number of minutes into a duration.
///
/// The fractional part is truncated toward zero, so `59.9` becomes 59 minutes.
pub fn minutes_from_decimal(minutes: f64) -> Result<TimeDelta, TimeParseError> {
    let invalid = || TimeParseError::InvalidLength {
        value: minutes.to_string(),
    };
    if !minutes.is_finite() || minutes < 0.0 {
        return Err(invalid());
    }
    // `as` saturates, so oversized values fall through to the range check.
    TimeDelta::try_minutes(minutes.trunc() as i64).ok_or_else(invalid)
}

/// Parse a decimal minutes string (`"60"`, `"45.5"`) into a duration.
pub fn parse_length_minutes(value: &str) -> Result<TimeDelta, TimeParseError> {
    let minutes: f64 = value
        .trim()
        .parse()
        .map_err(|_| TimeParseError::InvalidLength {
            value: value.to_string(),
        })?;
    minutes_from_decimal(minutes)
}

/// Serde adapter storing a [`TimeDelta`] as a whole number of minutes.
pub mod duration_minutes {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(duration.num_minutes())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<TimeDelta, D::Error>
    where
        D: Deserializer<'de>,
    {
        let minutes = i64::deserialize(deserializer)?;
        TimeDelta::try_minutes(minutes)
            .ok_or_else(|| serde::de::Error::custom(format!("duration out of range: {minutes}")))
    }
}
