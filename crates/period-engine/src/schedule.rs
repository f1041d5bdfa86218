//! The public period schedule: membership and boundary-distance queries.
//!
//! A [`PeriodSchedule`] is an immutable value. Every query localizes the
//! caller's instant, asks a [`WindowCalculator`] for the relevant window and
//! returns a boolean, an instant or a non-negative duration. Nothing is
//! cached between calls, so one schedule can be shared freely across threads.
//!
//! # Example
//!
//! ```
//! use chrono::{NaiveDate, TimeZone};
//! use period_engine::PeriodSchedule;
//!
//! let market = PeriodSchedule::builder("09:30:00", "16:00:00")
//!     .days([1, 2, 3, 4, 5])
//!     .timezone("America/New_York")
//!     .build()
//!     .unwrap();
//!
//! // Naive instants are wall-clock time in the schedule's zone.
//! let monday_8am = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap().and_hms_opt(8, 0, 0).unwrap();
//! assert!(!market.is_in_period(monday_8am));
//! assert_eq!(market.duration_until_next_start(monday_8am).unwrap().num_minutes(), 90);
//!
//! // Aware instants are converted first: 14:00 UTC is 10:00 EDT.
//! let aware = chrono::Utc.with_ymd_and_hms(2026, 3, 16, 14, 0, 0).unwrap();
//! assert!(market.is_in_period(aware));
//! ```

use std::fmt;

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::error::{PeriodError, Result};
use crate::time_of_day::TimeOfDay;
use crate::weekday::WeekdaySet;
use crate::window::{PeriodWindow, WindowCalculator};
use crate::zone::{Instant, TimezoneHandle, TimezoneSpec};

/// A recurring daily window restricted to a set of weekdays, in one timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSchedule {
    start: TimeOfDay,
    end: TimeOfDay,
    days: WeekdaySet,
    tz: TimezoneHandle,
}

impl PeriodSchedule {
    /// A schedule on every day of the week, in UTC.
    ///
    /// # Errors
    ///
    /// [`PeriodError::Validation`] if either time is not a valid `HH:MM:SS`.
    pub fn new(start: &str, end: &str) -> Result<Self> {
        Self::builder(start, end).build()
    }

    pub fn builder(start: &str, end: &str) -> PeriodScheduleBuilder {
        PeriodScheduleBuilder {
            start: start.to_string(),
            end: end.to_string(),
            days: None,
            tz: TimezoneSpec::default(),
        }
    }

    /// Assemble from already-validated parts.
    pub fn from_parts(
        start: TimeOfDay,
        end: TimeOfDay,
        days: WeekdaySet,
        tz: TimezoneHandle,
    ) -> Self {
        PeriodSchedule {
            start,
            end,
            days,
            tz,
        }
    }

    pub fn start_time(&self) -> TimeOfDay {
        self.start
    }

    pub fn end_time(&self) -> TimeOfDay {
        self.end
    }

    pub fn valid_days(&self) -> WeekdaySet {
        self.days
    }

    pub fn timezone(&self) -> &TimezoneHandle {
        &self.tz
    }

    pub fn spans_midnight(&self) -> bool {
        self.calculator().spans_midnight()
    }

    fn calculator(&self) -> WindowCalculator<'_> {
        WindowCalculator::new(self.start, self.end, self.days, &self.tz)
    }

    /// Convert a possibly-missing instant into the schedule's zone.
    ///
    /// # Errors
    ///
    /// [`PeriodError::Validation`] with reason `"null instant"` for `None`.
    pub fn localize_instant(&self, instant: Option<Instant>) -> Result<DateTime<FixedOffset>> {
        self.tz.localize(instant)
    }

    fn localize(&self, instant: impl Into<Instant>) -> DateTime<FixedOffset> {
        self.tz.convert(instant.into())
    }

    // ── membership ──────────────────────────────────────────────────────

    /// Whether `instant` falls inside a weekday-valid window `[start, end)`.
    pub fn is_in_period(&self, instant: impl Into<Instant>) -> bool {
        let now = self.localize(instant);
        let inside = self.calculator().containing(&now).is_some();
        debug!(%now, inside, "membership check");
        inside
    }

    /// The window containing `instant`, if it is inside the period.
    pub fn current_window(&self, instant: impl Into<Instant>) -> Option<PeriodWindow> {
        self.calculator().containing(&self.localize(instant))
    }

    /// The window the wall-clock reading of `instant` belongs to (today's,
    /// or yesterday's for the early-morning tail of an overnight period),
    /// whether or not `instant` is inside it. `None` if that day is filtered out.
    pub fn natural_window(&self, instant: impl Into<Instant>) -> Option<PeriodWindow> {
        self.calculator().natural(&self.localize(instant))
    }

    // ── boundaries ──────────────────────────────────────────────────────

    /// Latest period start at or before `instant`.
    ///
    /// # Errors
    ///
    /// [`PeriodError::NoOccurrence`] if no weekday is valid.
    pub fn previous_start(&self, instant: impl Into<Instant>) -> Result<DateTime<FixedOffset>> {
        self.calculator().previous_start(&self.localize(instant))
    }

    /// Earliest period start strictly after `instant`.
    pub fn next_start(&self, instant: impl Into<Instant>) -> Result<DateTime<FixedOffset>> {
        self.calculator().next_start(&self.localize(instant))
    }

    /// Latest period end at or before `instant`.
    pub fn previous_end(&self, instant: impl Into<Instant>) -> Result<DateTime<FixedOffset>> {
        self.calculator().previous_end(&self.localize(instant))
    }

    /// Earliest period end strictly after `instant`.
    pub fn next_end(&self, instant: impl Into<Instant>) -> Result<DateTime<FixedOffset>> {
        self.calculator().next_end(&self.localize(instant))
    }

    // ── durations ───────────────────────────────────────────────────────

    /// `instant - previous_start(instant)`; zero exactly on a start.
    pub fn duration_since_last_start(
        &self,
        instant: impl Into<Instant>,
    ) -> Result<chrono::Duration> {
        let now = self.localize(instant);
        Ok(now - self.calculator().previous_start(&now)?)
    }

    /// `next_start(instant) - instant`.
    pub fn duration_until_next_start(
        &self,
        instant: impl Into<Instant>,
    ) -> Result<chrono::Duration> {
        let now = self.localize(instant);
        Ok(self.calculator().next_start(&now)? - now)
    }

    /// `instant - previous_end(instant)`; zero exactly on an end.
    pub fn duration_since_last_end(&self, instant: impl Into<Instant>) -> Result<chrono::Duration> {
        let now = self.localize(instant);
        Ok(now - self.calculator().previous_end(&now)?)
    }

    /// `next_end(instant) - instant`.
    pub fn duration_until_next_end(&self, instant: impl Into<Instant>) -> Result<chrono::Duration> {
        let now = self.localize(instant);
        Ok(self.calculator().next_end(&now)? - now)
    }

    /// Time left in the window `instant` is inside.
    ///
    /// # Errors
    ///
    /// [`PeriodError::State`] if `instant` is outside the period.
    pub fn duration_until_current_end(
        &self,
        instant: impl Into<Instant>,
    ) -> Result<chrono::Duration> {
        let now = self.localize(instant);
        let window = self
            .calculator()
            .containing(&now)
            .ok_or_else(|| PeriodError::state(format!("{now} is outside the period")))?;
        Ok(window.end - now)
    }

    /// Time until the current day's window opens.
    ///
    /// Only defined while outside the period and before the window that
    /// [`natural_window`](Self::natural_window) picks has started.
    ///
    /// # Errors
    ///
    /// [`PeriodError::State`] if `instant` is inside the period, the day is
    /// filtered out, or the day's window has already ended.
    pub fn duration_until_current_start(
        &self,
        instant: impl Into<Instant>,
    ) -> Result<chrono::Duration> {
        let now = self.localize(instant);
        let calc = self.calculator();
        if calc.containing(&now).is_some() {
            return Err(PeriodError::state(format!("{now} is inside the period")));
        }
        let window = calc.natural(&now).ok_or_else(|| {
            PeriodError::state(format!("no period occurs on {}", now.date_naive()))
        })?;
        if window.start < now {
            return Err(PeriodError::state(format!(
                "the period of {} has already ended",
                window.anchor
            )));
        }
        Ok(window.start - now)
    }
}

impl fmt::Display for PeriodSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PeriodSchedule(start_time={}, end_time={}, tz={}, valid_days_of_week={})",
            self.start, self.end, self.tz, self.days
        )
    }
}

// ── Builder ─────────────────────────────────────────────────────────────────

/// Collects raw construction inputs; [`build`](Self::build) validates them all
/// at once.
#[derive(Debug, Clone)]
pub struct PeriodScheduleBuilder {
    start: String,
    end: String,
    days: Option<Vec<i64>>,
    tz: TimezoneSpec,
}

impl PeriodScheduleBuilder {
    /// Restrict to these weekdays (0 = Sunday). Not calling this means all days.
    pub fn days<I>(mut self, days: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<i64>,
    {
        self.days = Some(days.into_iter().map(Into::into).collect());
        self
    }

    /// Zone name, zone object or fixed offset. Defaults to UTC.
    pub fn timezone(mut self, tz: impl Into<TimezoneSpec>) -> Self {
        self.tz = tz.into();
        self
    }

    /// # Errors
    ///
    /// The first of: invalid start, invalid end, invalid days, unknown zone.
    pub fn build(self) -> Result<PeriodSchedule> {
        let start = TimeOfDay::parse(&self.start)?;
        let end = TimeOfDay::parse(&self.end)?;
        let days = match self.days {
            Some(days) => WeekdaySet::validate(days)?,
            None => WeekdaySet::all(),
        };
        let tz = TimezoneHandle::resolve(self.tz)?;

        debug!(%start, %end, %days, zone = %tz, "built period schedule");
        Ok(PeriodSchedule::from_parts(start, end, days, tz))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
