//! Structured breakdown of boundary distances.

use serde::Serialize;

/// A non-negative duration split into days/hours/minutes/seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationInfo {
    /// Total duration in whole seconds.
    pub total_seconds: i64,
    pub days: i64,
    /// Hours component (0-23).
    pub hours: i64,
    /// Minutes component (0-59).
    pub minutes: i64,
    /// Seconds component (0-59).
    pub seconds: i64,
    /// Human-readable representation (e.g., "2 days, 3 hours, 15 minutes").
    pub human_readable: String,
}

impl DurationInfo {
    /// Break a duration down. Sub-second precision is truncated; a negative
    /// input is decomposed by absolute value but keeps its sign in
    /// `total_seconds`.
    ///
    /// # Examples
    ///
    /// ```
    /// use period_engine::DurationInfo;
    ///
    /// let info = DurationInfo::from_duration(chrono::Duration::minutes(90));
    /// assert_eq!((info.hours, info.minutes), (1, 30));
    /// assert_eq!(info.human_readable, "1 hour, 30 minutes");
    /// ```
    pub fn from_duration(duration: chrono::Duration) -> Self {
        let total_seconds = duration.num_seconds();
        let abs_seconds = total_seconds.unsigned_abs();

        let days = (abs_seconds / 86400) as i64;
        let remainder = abs_seconds % 86400;
        let hours = (remainder / 3600) as i64;
        let remainder = remainder % 3600;
        let minutes = (remainder / 60) as i64;
        let seconds = (remainder % 60) as i64;

        DurationInfo {
            total_seconds,
            days,
            hours,
            minutes,
            seconds,
            human_readable: format_human_duration(days, hours, minutes, seconds),
        }
    }
}

impl From<chrono::Duration> for DurationInfo {
    fn from(duration: chrono::Duration) -> Self {
        DurationInfo::from_duration(duration)
    }
}

fn plural(n: i64, unit: &str) -> String {
    format!("{} {}{}", n, unit, if n == 1 { "" } else { "s" })
}

fn format_human_duration(days: i64, hours: i64, minutes: i64, seconds: i64) -> String {
    let mut parts = Vec::new();
    if days > 0 {
        parts.push(plural(days, "day"));
    }
    if hours > 0 {
        parts.push(plural(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(plural(minutes, "minute"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(plural(seconds, "second"));
    }
    parts.join(", ")
}
