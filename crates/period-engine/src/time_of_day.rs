//! Wall-clock time of day parsed from the canonical `HH:MM:SS` form.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PeriodError, Result};

const INVALID_TIME: &str = "invalid time component";

/// An immutable, always-valid wall-clock time (hour 0-23, minute 0-59, second 0-59).
///
/// Formats back to the same `HH:MM:SS` string it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Parse a strict `HH:MM:SS` string.
    ///
    /// Each component must be exactly two ASCII digits. Leap seconds (`:60`)
    /// and fractional seconds are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::Validation`] with reason `"invalid time component"`
    /// for any other format or an out-of-range component.
    ///
    /// # Examples
    ///
    /// ```
    /// use period_engine::TimeOfDay;
    ///
    /// let t = TimeOfDay::parse("09:30:00").unwrap();
    /// assert_eq!((t.hour(), t.minute(), t.second()), (9, 30, 0));
    /// assert_eq!(t.to_string(), "09:30:00");
    /// assert!(TimeOfDay::parse("24:00:00").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 8 || bytes[2] != b':' || bytes[5] != b':' {
            return Err(PeriodError::validation(INVALID_TIME, s));
        }

        let invalid = || PeriodError::validation(INVALID_TIME, s);
        let hour = two_digits(&bytes[0..2]).ok_or_else(invalid)?;
        let minute = two_digits(&bytes[3..5]).ok_or_else(invalid)?;
        let second = two_digits(&bytes[6..8]).ok_or_else(invalid)?;

        Self::from_hms(hour, minute, second).map_err(|_| invalid())
    }

    /// Build from numeric components.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Result<Self> {
        let invalid = || PeriodError::validation(INVALID_TIME, format!("{hour}:{minute}:{second}"));
        if hour > 23 || minute > 59 || second > 59 {
            return Err(invalid());
        }
        NaiveTime::from_hms_opt(hour, minute, second)
            .map(TimeOfDay)
            .ok_or_else(invalid)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    /// The chrono representation, for combining with a calendar date.
    pub fn to_naive(&self) -> NaiveTime {
        self.0
    }
}

/// Parse exactly two ASCII digits.
fn two_digits(b: &[u8]) -> Option<u32> {
    match b {
        [hi @ b'0'..=b'9', lo @ b'0'..=b'9'] => {
            Some(u32::from(hi - b'0') * 10 + u32::from(lo - b'0'))
        }
        _ => None,
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

impl FromStr for TimeOfDay {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self> {
        TimeOfDay::parse(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TimeOfDay::parse(&s).map_err(serde::de::Error::custom)
    }
}
