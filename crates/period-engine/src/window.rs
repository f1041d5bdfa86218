//! Concrete occurrences of a recurring period.
//!
//! A window is anchored to the calendar date its start falls on. For a
//! schedule whose end time is at or before its start time the window runs
//! into the following date. Only anchors whose weekday is in the schedule's
//! [`WeekdaySet`] produce a window.
//!
//! Every search walks whole calendar days from the instant's local date and
//! gives up after one week's worth of anchors, plus the extra day a window
//! ending after its anchor date needs, so an empty weekday set ends in
//! [`PeriodError::NoOccurrence`] instead of looping.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::Serialize;
use tracing::trace;

use crate::error::{PeriodError, Result};
use crate::time_of_day::TimeOfDay;
use crate::weekday::WeekdaySet;
use crate::zone::TimezoneHandle;

/// Days searched past the natural anchor; one full week.
const SEARCH_HORIZON_DAYS: i64 = 7;

/// One occurrence of a period: the half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    /// Local calendar date the window starts on.
    pub anchor: NaiveDate,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl PeriodWindow {
    /// Inclusive start, exclusive end.
    pub fn contains(&self, instant: &DateTime<FixedOffset>) -> bool {
        self.start <= *instant && *instant < self.end
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

/// Locates windows for a start/end time pair, weekday set and zone.
///
/// Holds borrowed configuration only; every call recomputes from scratch.
#[derive(Debug, Clone, Copy)]
pub struct WindowCalculator<'a> {
    start: TimeOfDay,
    end: TimeOfDay,
    days: WeekdaySet,
    tz: &'a TimezoneHandle,
}

impl<'a> WindowCalculator<'a> {
    pub fn new(start: TimeOfDay, end: TimeOfDay, days: WeekdaySet, tz: &'a TimezoneHandle) -> Self {
        WindowCalculator {
            start,
            end,
            days,
            tz,
        }
    }

    /// `end <= start`: the window crosses into the next calendar date.
    ///
    /// Equal times give a 24-hour window.
    pub fn spans_midnight(&self) -> bool {
        self.end <= self.start
    }

    /// The window anchored on `anchor`, if that date passes the weekday filter.
    pub fn window_for(&self, anchor: NaiveDate) -> Option<PeriodWindow> {
        if !self.days.contains(anchor.weekday()) {
            return None;
        }

        let end_date = if self.spans_midnight() {
            anchor + chrono::Duration::days(1)
        } else {
            anchor
        };
        let start = self.tz.at(anchor, self.start);
        let end = self.tz.at(end_date, self.end);

        // A transition gap can swallow a short window entirely.
        if end <= start {
            trace!(%anchor, "window collapsed by a timezone transition");
            return None;
        }

        Some(PeriodWindow { anchor, start, end })
    }

    /// The window that contains `now`, if any.
    ///
    /// Only windows anchored on `now`'s date or the day before can reach it.
    pub fn containing(&self, now: &DateTime<FixedOffset>) -> Option<PeriodWindow> {
        let today = now.date_naive();
        [today, today - chrono::Duration::days(1)]
            .into_iter()
            .filter_map(|anchor| self.window_for(anchor))
            .find(|w| w.contains(now))
    }

    /// The window the wall-clock reading of `now` naturally belongs to.
    ///
    /// This is today's window, except that for a midnight-spanning schedule an
    /// early-morning time before `end` belongs to the window that started
    /// yesterday. The window may lie entirely before or after `now`.
    pub fn natural(&self, now: &DateTime<FixedOffset>) -> Option<PeriodWindow> {
        let today = now.date_naive();
        let anchor = if self.spans_midnight() && now.time() < self.end.to_naive() {
            today - chrono::Duration::days(1)
        } else {
            today
        };
        self.window_for(anchor)
    }

    /// Earliest window start strictly after `now`.
    pub fn next_start(&self, now: &DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>> {
        let anchors = forward(now.date_naive(), 0);
        let found = self.scan(anchors, |w| (w.start > *now).then_some(w.start));
        trace!(%now, ?found, "next start");
        found
    }

    /// Latest window start at or before `now`.
    pub fn previous_start(&self, now: &DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>> {
        let anchors = backward(now.date_naive(), SEARCH_HORIZON_DAYS);
        let found = self.scan(anchors, |w| (w.start <= *now).then_some(w.start));
        trace!(%now, ?found, "previous start");
        found
    }

    /// Earliest window end strictly after `now`.
    pub fn next_end(&self, now: &DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>> {
        // Yesterday's window may still be running.
        let anchors = forward(now.date_naive(), -1);
        let found = self.scan(anchors, |w| (w.end > *now).then_some(w.end));
        trace!(%now, ?found, "next end");
        found
    }

    /// Latest window end at or before `now`.
    pub fn previous_end(&self, now: &DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>> {
        // A window that ends the day after its anchor may still be running, in
        // which case the last finished one is anchored a full week and a day back.
        let anchors = backward(now.date_naive(), SEARCH_HORIZON_DAYS + 1);
        let found = self.scan(anchors, |w| (w.end <= *now).then_some(w.end));
        trace!(%now, ?found, "previous end");
        found
    }

    /// First boundary `pick` accepts among the windows of `anchors`, in order.
    fn scan<F>(
        &self,
        anchors: impl Iterator<Item = NaiveDate>,
        pick: F,
    ) -> Result<DateTime<FixedOffset>>
    where
        F: Fn(&PeriodWindow) -> Option<DateTime<FixedOffset>>,
    {
        anchors
            .filter_map(|anchor| self.window_for(anchor))
            .find_map(|w| pick(&w))
            .ok_or_else(|| PeriodError::NoOccurrence {
                days: self.days.to_string(),
            })
    }
}

/// `from + first_offset`, then one day later at a time, through
/// `from + SEARCH_HORIZON_DAYS`.
fn forward(from: NaiveDate, first_offset: i64) -> impl Iterator<Item = NaiveDate> {
    (first_offset..=SEARCH_HORIZON_DAYS).map(move |n| from + chrono::Duration::days(n))
}

/// `from`, then one day earlier at a time, through `from - last_offset`.
fn backward(from: NaiveDate, last_offset: i64) -> impl Iterator<Item = NaiveDate> {
    (0..=last_offset).map(move |n| from - chrono::Duration::days(n))
}

// ── Tests ───────────────────────────────────────────────────────────────────
