//! The set of weekdays a period may start on.
//!
//! Days are numbered the POSIX way: 0 = Sunday through 6 = Saturday.

use std::collections::BTreeSet;
use std::fmt;

use chrono::Weekday;

use crate::error::{PeriodError, Result};

/// A validated, immutable set of weekdays stored as a 7-bit mask.
///
/// The empty set is legal: a schedule over it never applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdaySet(u8);

const ALL_MASK: u8 = 0b111_1111;

impl WeekdaySet {
    /// Validate a collection of day indices.
    ///
    /// Duplicates collapse first. More than seven distinct values are then
    /// rejected before any range checks, so `0..=7` reports the count.
    ///
    /// # Errors
    ///
    /// [`PeriodError::Validation`] with reason `"more than 7 days"` or
    /// `"day out of range"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use period_engine::WeekdaySet;
    ///
    /// let weekdays = WeekdaySet::validate([1, 2, 3, 4, 5]).unwrap();
    /// assert_eq!(weekdays.len(), 5);
    /// assert!(WeekdaySet::validate([7]).is_err());
    /// ```
    pub fn validate<I>(days: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<i64>,
    {
        let days: BTreeSet<i64> = days.into_iter().map(Into::into).collect();
        if days.len() > 7 {
            return Err(PeriodError::validation(
                "more than 7 days",
                format_days(days.iter().copied()),
            ));
        }

        let mut mask = 0u8;
        for day in days {
            if !(0..=6).contains(&day) {
                return Err(PeriodError::validation("day out of range", day.to_string()));
            }
            mask |= 1 << day;
        }
        Ok(WeekdaySet(mask))
    }

    /// Every day of the week; the default when a caller specifies nothing.
    pub fn all() -> Self {
        WeekdaySet(ALL_MASK)
    }

    pub fn none() -> Self {
        WeekdaySet(0)
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.contains_index(weekday.num_days_from_sunday() as u8)
    }

    /// Membership by POSIX index (0 = Sunday). Indices above 6 are never members.
    pub fn contains_index(&self, day: u8) -> bool {
        day < 7 && self.0 & (1 << day) != 0
    }

    /// Member indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0u8..7).filter(move |d| self.contains_index(*d))
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for WeekdaySet {
    fn default() -> Self {
        WeekdaySet::all()
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_days(self.iter().map(i64::from)))
    }
}

fn format_days(days: impl Iterator<Item = i64>) -> String {
    let parts: Vec<String> = days.map(|d| d.to_string()).collect();
    format!("[{}]", parts.join(", "))
}
