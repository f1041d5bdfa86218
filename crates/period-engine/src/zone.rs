//! Timezone resolution and localization.
//!
//! The zone database sits behind the narrow [`ZoneRules`] trait. The
//! chrono-tz IANA database and fixed offsets implement it out of the box;
//! tests (or callers with their own rules) can plug in anything else.
//!
//! Offsets are looked up fresh for every instant so that each calendar date
//! gets the DST rules in force on that date.

use std::fmt;
use std::sync::Arc;

use chrono::offset::LocalResult;
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use tracing::{debug, trace};

use crate::error::{PeriodError, Result};
use crate::time_of_day::TimeOfDay;

// ── ZoneRules ───────────────────────────────────────────────────────────────

/// The offset rules of a timezone.
///
/// Implementations must be pure: the same input always yields the same offset.
pub trait ZoneRules: fmt::Debug + Send + Sync {
    /// Display name (an IANA identifier, or an offset such as `+05:30`).
    fn name(&self) -> String;

    /// The offset in effect at a UTC instant.
    fn offset_from_utc(&self, utc: &NaiveDateTime) -> FixedOffset;

    /// The offset(s) that map a local wall-clock time to an instant.
    ///
    /// `None` for times skipped by a transition, `Ambiguous` for times that
    /// occur twice.
    fn offset_from_local(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset>;
}

impl ZoneRules for Tz {
    fn name(&self) -> String {
        Tz::name(*self).to_string()
    }

    fn offset_from_utc(&self, utc: &NaiveDateTime) -> FixedOffset {
        TimeZone::offset_from_utc_datetime(self, utc).fix()
    }

    fn offset_from_local(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        TimeZone::offset_from_local_datetime(self, local).map(|o| o.fix())
    }
}

impl ZoneRules for FixedOffset {
    fn name(&self) -> String {
        format_utc_offset(self.local_minus_utc())
    }

    fn offset_from_utc(&self, _utc: &NaiveDateTime) -> FixedOffset {
        *self
    }

    fn offset_from_local(&self, _local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        LocalResult::Single(*self)
    }
}

// ── TimezoneSpec ────────────────────────────────────────────────────────────

/// Everything a caller may hand over as "the schedule's timezone".
#[derive(Debug, Clone)]
pub enum TimezoneSpec {
    /// An IANA name (`"Australia/Sydney"`) or an offset string (`"+05:30"`).
    Name(String),
    /// A chrono-tz zone.
    Zone(Tz),
    /// A fixed UTC offset.
    Fixed(FixedOffset),
    /// Caller-supplied rules.
    Custom(Arc<dyn ZoneRules>),
    /// An already resolved handle, passed through as is.
    Resolved(TimezoneHandle),
}

impl Default for TimezoneSpec {
    fn default() -> Self {
        TimezoneSpec::Zone(Tz::UTC)
    }
}

impl From<&str> for TimezoneSpec {
    fn from(s: &str) -> Self {
        TimezoneSpec::Name(s.to_string())
    }
}

impl From<String> for TimezoneSpec {
    fn from(s: String) -> Self {
        TimezoneSpec::Name(s)
    }
}

impl From<&String> for TimezoneSpec {
    fn from(s: &String) -> Self {
        TimezoneSpec::Name(s.clone())
    }
}

impl From<Tz> for TimezoneSpec {
    fn from(tz: Tz) -> Self {
        TimezoneSpec::Zone(tz)
    }
}

impl From<FixedOffset> for TimezoneSpec {
    fn from(offset: FixedOffset) -> Self {
        TimezoneSpec::Fixed(offset)
    }
}

impl From<Utc> for TimezoneSpec {
    fn from(_: Utc) -> Self {
        TimezoneSpec::Zone(Tz::UTC)
    }
}

impl From<Arc<dyn ZoneRules>> for TimezoneSpec {
    fn from(rules: Arc<dyn ZoneRules>) -> Self {
        TimezoneSpec::Custom(rules)
    }
}

impl From<TimezoneHandle> for TimezoneSpec {
    fn from(handle: TimezoneHandle) -> Self {
        TimezoneSpec::Resolved(handle)
    }
}

// ── Instant ─────────────────────────────────────────────────────────────────

/// A caller-supplied point in time, with or without an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instant {
    /// Carries an offset: converted to the schedule's zone, same absolute instant.
    Aware(DateTime<FixedOffset>),
    /// No offset: read as wall-clock time in the schedule's zone.
    Naive(NaiveDateTime),
}

impl Instant {
    /// Parse an RFC 3339 string (aware) or `YYYY-MM-DDTHH:MM:SS[.f]` /
    /// `YYYY-MM-DD HH:MM:SS[.f]` (naive).
    ///
    /// # Errors
    ///
    /// [`PeriodError::Validation`] with reason `"invalid instant"`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Instant::Aware(dt));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(Instant::Naive)
            .ok_or_else(|| PeriodError::validation("invalid instant", s))
    }

    pub fn is_naive(&self) -> bool {
        matches!(self, Instant::Naive(_))
    }
}

impl<Z: TimeZone> From<DateTime<Z>> for Instant {
    fn from(dt: DateTime<Z>) -> Self {
        let offset = dt.offset().fix();
        Instant::Aware(dt.with_timezone(&offset))
    }
}

impl From<NaiveDateTime> for Instant {
    fn from(naive: NaiveDateTime) -> Self {
        Instant::Naive(naive)
    }
}

// ── TimezoneHandle ──────────────────────────────────────────────────────────

/// A resolved timezone. Cheap to clone and safe to share between threads.
#[derive(Clone)]
pub struct TimezoneHandle {
    rules: Arc<dyn ZoneRules>,
    custom: bool,
}

impl TimezoneHandle {
    /// Resolve a zone name, zone object or fixed offset.
    ///
    /// Names are looked up in the IANA database first; a name that is not a
    /// zone but reads as an offset (`Z`, `+05:30`, `-0800`, `+09`) becomes a
    /// fixed offset.
    ///
    /// # Errors
    ///
    /// [`PeriodError::Timezone`] with reason `"unknown zone"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use period_engine::TimezoneHandle;
    ///
    /// assert_eq!(TimezoneHandle::resolve("Australia/Sydney").unwrap().name(), "Australia/Sydney");
    /// assert_eq!(TimezoneHandle::resolve("+05:30").unwrap().name(), "+05:30");
    /// assert!(TimezoneHandle::resolve("Invalid/Zone").is_err());
    /// ```
    pub fn resolve(spec: impl Into<TimezoneSpec>) -> Result<Self> {
        let (rules, custom): (Arc<dyn ZoneRules>, bool) = match spec.into() {
            TimezoneSpec::Name(name) => (resolve_name(&name)?, false),
            TimezoneSpec::Zone(tz) => (Arc::new(tz), false),
            TimezoneSpec::Fixed(offset) => (Arc::new(offset), false),
            TimezoneSpec::Custom(rules) => (rules, true),
            TimezoneSpec::Resolved(handle) => return Ok(handle),
        };
        debug!(zone = %rules.name(), custom, "resolved timezone");
        Ok(TimezoneHandle { rules, custom })
    }

    pub fn utc() -> Self {
        TimezoneHandle {
            rules: Arc::new(Tz::UTC),
            custom: false,
        }
    }

    pub fn name(&self) -> String {
        self.rules.name()
    }

    /// Bring a caller instant into this zone.
    ///
    /// Aware instants keep their absolute position; naive ones are read as
    /// wall-clock time here.
    ///
    /// # Errors
    ///
    /// [`PeriodError::Validation`] with reason `"null instant"` when `instant` is `None`.
    pub fn localize(&self, instant: Option<Instant>) -> Result<DateTime<FixedOffset>> {
        instant
            .map(|i| self.convert(i))
            .ok_or_else(|| PeriodError::validation("null instant", "None"))
    }

    /// [`localize`](Self::localize) for an instant that is known to be present.
    pub fn convert(&self, instant: Instant) -> DateTime<FixedOffset> {
        match instant {
            Instant::Aware(dt) => self.in_zone(dt.with_timezone(&Utc)),
            Instant::Naive(naive) => self.resolve_local(naive),
        }
    }

    /// The same instant expressed with this zone's offset at that instant.
    pub fn in_zone(&self, utc: DateTime<Utc>) -> DateTime<FixedOffset> {
        let offset = self.rules.offset_from_utc(&utc.naive_utc());
        utc.with_timezone(&offset)
    }

    /// Resolve a wall-clock time in this zone to an instant.
    ///
    /// A time that occurs twice (DST fold) resolves to the earlier instant.
    /// A time that never occurs (DST gap) is shifted forward by the length of
    /// the gap, so 02:30 on a spring-forward night becomes 03:30.
    pub fn resolve_local(&self, local: NaiveDateTime) -> DateTime<FixedOffset> {
        match self.rules.offset_from_local(&local) {
            LocalResult::Single(offset) => with_offset(local, offset),
            LocalResult::Ambiguous(first, second) => {
                trace!(%local, "local time is ambiguous; taking the earlier instant");
                let a = with_offset(local, first);
                let b = with_offset(local, second);
                if a <= b {
                    a
                } else {
                    b
                }
            }
            LocalResult::None => {
                trace!(%local, "local time falls in a transition gap; shifting forward");
                // The offset a day earlier is the one in force before the gap.
                let before = self
                    .rules
                    .offset_from_utc(&(local - chrono::Duration::days(1)));
                let utc = local - chrono::Duration::seconds(i64::from(before.local_minus_utc()));
                self.in_zone(Utc.from_utc_datetime(&utc))
            }
        }
    }

    /// `time` on `date`, in this zone.
    pub fn at(&self, date: NaiveDate, time: TimeOfDay) -> DateTime<FixedOffset> {
        self.resolve_local(date.and_time(time.to_naive()))
    }

    /// Move `instant` by `days` calendar days, keeping its wall-clock time.
    ///
    /// The offset is re-resolved for the target date, so a day that contains a
    /// DST transition is 23 or 25 hours long.
    ///
    /// This is for callers holding an instant. Window computation steps the
    /// local date and resolves each boundary with [`at`](Self::at) instead, so
    /// a boundary shifted out of a DST gap does not carry its shifted
    /// wall-clock time into later weeks.
    pub fn add_calendar_days(
        &self,
        instant: &DateTime<FixedOffset>,
        days: i64,
    ) -> DateTime<FixedOffset> {
        let local = self.in_zone(instant.with_timezone(&Utc)).naive_local();
        let date = local.date() + chrono::Duration::days(days);
        self.resolve_local(date.and_time(local.time()))
    }
}

impl Default for TimezoneHandle {
    fn default() -> Self {
        TimezoneHandle::utc()
    }
}

impl fmt::Debug for TimezoneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TimezoneHandle").field(&self.rules.name()).finish()
    }
}

impl fmt::Display for TimezoneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rules.name())
    }
}

/// Database zones and fixed offsets are equal when their names are; their
/// rules are fully determined by the name. Custom rules are equal only to
/// handles sharing the same rules object, whatever name they report.
impl PartialEq for TimezoneHandle {
    fn eq(&self, other: &Self) -> bool {
        if self.custom || other.custom {
            return Arc::ptr_eq(&self.rules, &other.rules);
        }
        self.rules.name() == other.rules.name()
    }
}

// ── Internal helpers ────────────────────────────────────────────────────────

fn resolve_name(name: &str) -> Result<Arc<dyn ZoneRules>> {
    let trimmed = name.trim();
    if let Ok(tz) = trimmed.parse::<Tz>() {
        return Ok(Arc::new(tz));
    }
    if let Some(offset) = parse_utc_offset(trimmed) {
        return Ok(Arc::new(offset));
    }
    Err(PeriodError::Timezone {
        reason: "unknown zone",
        name: name.to_string(),
    })
}

/// Parse `Z`, `+HH`, `+HHMM` or `+HH:MM` (either sign).
fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    if s == "Z" || s == "z" {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1i32, &s[1..]),
        Some(b'-') => (-1i32, &s[1..]),
        _ => return None,
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    // A colon is only allowed as `HH:MM`.
    if rest.contains(':') && (rest.len() != 5 || rest.as_bytes()[2] != b':') {
        return None;
    }

    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Format an offset in seconds as `+HH:MM`.
fn format_utc_offset(offset_secs: i32) -> String {
    let sign = if offset_secs >= 0 { "+" } else { "-" };
    let abs_secs = offset_secs.unsigned_abs();
    let hours = abs_secs / 3600;
    let minutes = (abs_secs % 3600) / 60;
    format!("{sign}{hours:02}:{minutes:02}")
}

fn with_offset(local: NaiveDateTime, offset: FixedOffset) -> DateTime<FixedOffset> {
    let utc = local - chrono::Duration::seconds(i64::from(offset.local_minus_utc()));
    Utc.from_utc_datetime(&utc).with_timezone(&offset)
}

// ── Tests ───────────────────────────────────────────────────────────────────
