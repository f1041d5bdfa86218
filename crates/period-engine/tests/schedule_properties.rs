//! Property tests for PeriodSchedule membership and boundary search.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use period_engine::{PeriodError, PeriodSchedule, TimeOfDay, TimezoneHandle, WeekdaySet};
use proptest::prelude::*;

// 2020-01-01 .. 2030-01-01
const MIN_TS: i64 = 1_577_836_800;
const MAX_TS: i64 = 1_893_456_000;

fn time_of_day() -> impl Strategy<Value = TimeOfDay> {
    (0u32..24, 0u32..60, 0u32..60).prop_map(|(h, m, s)| TimeOfDay::from_hms(h, m, s).unwrap())
}

fn weekdays() -> impl Strategy<Value = WeekdaySet> {
    proptest::collection::vec(0i64..7, 0..7).prop_map(|d| WeekdaySet::validate(d).unwrap())
}

fn instant() -> impl Strategy<Value = DateTime<Utc>> {
    (MIN_TS..MAX_TS).prop_map(|ts| Utc.timestamp_opt(ts, 0).unwrap())
}

fn zone() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "UTC",
        "America/New_York",
        "Australia/Sydney",
        "Asia/Kolkata",
        "Europe/London",
    ])
}

fn schedule(start: TimeOfDay, end: TimeOfDay, days: WeekdaySet, tz: &str) -> PeriodSchedule {
    PeriodSchedule::from_parts(start, end, days, TimezoneHandle::resolve(tz).unwrap())
}

fn secs(t: TimeOfDay) -> u32 {
    t.hour() * 3600 + t.minute() * 60 + t.second()
}

/// Independent membership oracle for UTC schedules, in plain second-of-day arithmetic.
fn utc_oracle(start: TimeOfDay, end: TimeOfDay, days: WeekdaySet, at: DateTime<Utc>) -> bool {
    let s = at.num_seconds_from_midnight();
    let today = at.weekday().num_days_from_sunday() as u8;
    let yesterday = (today + 6) % 7;
    if secs(end) > secs(start) {
        days.contains_index(today) && secs(start) <= s && s < secs(end)
    } else {
        (days.contains_index(today) && s >= secs(start))
            || (days.contains_index(yesterday) && s < secs(end))
    }
}

proptest! {
    #[test]
    fn membership_matches_oracle_in_utc(
        start in time_of_day(),
        end in time_of_day(),
        days in weekdays(),
        at in instant(),
    ) {
        let ps = schedule(start, end, days, "UTC");
        prop_assert_eq!(ps.is_in_period(at), utc_oracle(start, end, days, at));
    }

    #[test]
    fn next_start_round_trip(
        start in time_of_day(),
        end in time_of_day(),
        days in weekdays(),
        tz in zone(),
        at in instant(),
    ) {
        let ps = schedule(start, end, days, tz);
        match (ps.next_start(at), ps.duration_until_next_start(at)) {
            (Ok(next), Ok(until)) => {
                prop_assert!(until > chrono::Duration::zero());
                prop_assert_eq!(at + until, next);
                prop_assert!(until <= chrono::Duration::days(8));
            }
            (Err(PeriodError::NoOccurrence { .. }), Err(PeriodError::NoOccurrence { .. })) => {
                prop_assert!(days.is_empty());
            }
            other => prop_assert!(false, "unexpected: {:?}", other),
        }
    }

    #[test]
    fn durations_are_non_negative(
        start in time_of_day(),
        end in time_of_day(),
        days in weekdays(),
        tz in zone(),
        at in instant(),
    ) {
        prop_assume!(!days.is_empty());
        let ps = schedule(start, end, days, tz);
        let zero = chrono::Duration::zero();
        prop_assert!(ps.duration_since_last_start(at).unwrap() >= zero);
        prop_assert!(ps.duration_since_last_end(at).unwrap() >= zero);
        prop_assert!(ps.duration_until_next_start(at).unwrap() > zero);
        prop_assert!(ps.duration_until_next_end(at).unwrap() > zero);
    }

    #[test]
    fn boundaries_are_half_open(
        start in time_of_day(),
        end in time_of_day(),
        days in weekdays(),
        tz in prop::sample::select(vec!["UTC", "Asia/Kolkata", "Asia/Tokyo"]),
        at in instant(),
    ) {
        prop_assume!(!days.is_empty());
        prop_assume!(start != end);
        let ps = schedule(start, end, days, tz);
        let next_start = ps.next_start(at).unwrap();
        let next_end = ps.next_end(at).unwrap();
        prop_assert!(ps.is_in_period(next_start));
        prop_assert!(!ps.is_in_period(next_end));
    }

    #[test]
    fn inside_means_last_start_after_last_end(
        start in time_of_day(),
        end in time_of_day(),
        days in weekdays(),
        tz in zone(),
        at in instant(),
    ) {
        prop_assume!(!days.is_empty());
        prop_assume!(start != end);
        let ps = schedule(start, end, days, tz);
        if ps.is_in_period(at) {
            prop_assert!(ps.previous_start(at).unwrap() > ps.previous_end(at).unwrap());
            prop_assert!(ps.duration_until_current_end(at).is_ok());
            prop_assert!(ps.duration_until_current_start(at).is_err());
        } else {
            prop_assert!(ps.duration_until_current_end(at).is_err());
        }
    }

    #[test]
    fn zone_of_the_instant_does_not_matter(
        start in time_of_day(),
        end in time_of_day(),
        days in weekdays(),
        tz in zone(),
        at in instant(),
    ) {
        let ps = schedule(start, end, days, tz);
        let tokyo = at.with_timezone(&chrono_tz::Asia::Tokyo);
        let la = at.with_timezone(&chrono_tz::America::Los_Angeles);
        let expected = ps.is_in_period(at);
        prop_assert_eq!(ps.is_in_period(tokyo), expected);
        prop_assert_eq!(ps.is_in_period(la), expected);
    }

    #[test]
    fn queries_are_idempotent(
        start in time_of_day(),
        end in time_of_day(),
        days in weekdays(),
        tz in zone(),
        at in instant(),
    ) {
        let ps = schedule(start, end, days, tz);
        prop_assert_eq!(ps.is_in_period(at), ps.is_in_period(at));
        prop_assert_eq!(ps.previous_end(at), ps.previous_end(at));
        prop_assert_eq!(ps.next_end(at), ps.next_end(at));
    }
}
