//! End-to-end scenarios through the public API.

use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::America::New_York;
use period_engine::{DurationInfo, Instant, PeriodError, PeriodSchedule};

fn naive(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn market() -> PeriodSchedule {
    PeriodSchedule::builder("09:30:00", "16:00:00")
        .days([1, 2, 3, 4, 5])
        .timezone("America/New_York")
        .build()
        .unwrap()
}

// ── New York trading session ───────────────────────────────────────────────

#[test]
fn test_market_monday_morning_inside() {
    // 2026-03-16 is a Monday
    let monday_10 = New_York.with_ymd_and_hms(2026, 3, 16, 10, 0, 0).unwrap();
    assert!(market().is_in_period(monday_10));
}

#[test]
fn test_market_saturday_outside() {
    let saturday_10 = New_York.with_ymd_and_hms(2026, 3, 21, 10, 0, 0).unwrap();
    assert!(!market().is_in_period(saturday_10));
}

#[test]
fn test_market_monday_8am_until_open() {
    let monday_8 = New_York.with_ymd_and_hms(2026, 3, 16, 8, 0, 0).unwrap();
    let until = market().duration_until_next_start(monday_8).unwrap();
    assert_eq!(until, Duration::hours(1) + Duration::minutes(30));
    assert_eq!(DurationInfo::from(until).human_readable, "1 hour, 30 minutes");
}

#[test]
fn test_market_friday_close_until_monday_open() {
    let friday_close = New_York.with_ymd_and_hms(2026, 3, 20, 16, 0, 0).unwrap();
    let ps = market();
    assert!(!ps.is_in_period(friday_close));
    // 16:00 Friday → 09:30 Monday
    assert_eq!(
        ps.duration_until_next_start(friday_close).unwrap(),
        Duration::hours(65) + Duration::minutes(30)
    );
    assert_eq!(ps.duration_since_last_end(friday_close).unwrap(), Duration::zero());
}

#[test]
fn test_market_weekend_spanning_spring_forward() {
    // Friday 2026-03-06 close (EST) → Monday 2026-03-09 open (EDT) loses an hour
    let ps = market();
    let friday_close = New_York.with_ymd_and_hms(2026, 3, 6, 16, 0, 0).unwrap();
    assert_eq!(
        ps.duration_until_next_start(friday_close).unwrap(),
        Duration::hours(64) + Duration::minutes(30)
    );
    assert_eq!(
        ps.next_start(friday_close).unwrap().to_rfc3339(),
        "2026-03-09T09:30:00-04:00"
    );
}

#[test]
fn test_market_utc_instant_converted() {
    // 14:00 UTC on a Monday in March (EDT) is 10:00 in New York
    let aware = Utc.with_ymd_and_hms(2026, 3, 16, 14, 0, 0).unwrap();
    assert!(market().is_in_period(aware));
    // The same wall-clock reading, naive, is 14:00 in New York: still open
    assert!(market().is_in_period(naive(2026, 3, 16, 14, 0, 0)));
    // 21:00 UTC is 17:00 EDT: closed
    let late = Utc.with_ymd_and_hms(2026, 3, 16, 21, 0, 0).unwrap();
    assert!(!market().is_in_period(late));
}

// ── Midnight spanning ──────────────────────────────────────────────────────

#[test]
fn test_overnight_22_to_06() {
    let ps = PeriodSchedule::new("22:00:00", "06:00:00").unwrap();
    assert!(ps.is_in_period(naive(2026, 5, 4, 23, 30, 0)));
    assert!(ps.is_in_period(naive(2026, 5, 5, 3, 0, 0)));
    assert!(!ps.is_in_period(naive(2026, 5, 5, 12, 0, 0)));
}

#[test]
fn test_overnight_across_fall_back_is_nine_hours() {
    let ps = PeriodSchedule::builder("22:00:00", "06:00:00")
        .timezone("America/New_York")
        .build()
        .unwrap();
    // Night of Oct 31 → Nov 1, 2026 gains an hour
    let w = ps.current_window(naive(2026, 11, 1, 3, 0, 0)).unwrap();
    assert_eq!(w.duration(), Duration::hours(9));
    assert_eq!(
        ps.duration_until_current_end(naive(2026, 11, 1, 3, 0, 0)).unwrap(),
        Duration::hours(3)
    );
}

// ── Weekday filter ─────────────────────────────────────────────────────────

#[test]
fn test_monday_only() {
    let ps = PeriodSchedule::builder("09:00:00", "17:00:00")
        .days([1])
        .build()
        .unwrap();
    // 2026-05-04 is a Monday
    assert!(ps.is_in_period(Utc.with_ymd_and_hms(2026, 5, 4, 10, 0, 0).unwrap()));
    assert!(!ps.is_in_period(Utc.with_ymd_and_hms(2026, 5, 5, 10, 0, 0).unwrap()));
    // From Tuesday the next start is six days away
    assert_eq!(
        ps.duration_until_next_start(naive(2026, 5, 5, 9, 0, 0)).unwrap(),
        Duration::days(6)
    );
}

#[test]
fn test_sunday_only_search_from_friday() {
    let ps = PeriodSchedule::builder("09:00:00", "17:00:00")
        .days([0])
        .build()
        .unwrap();
    // Friday 2023-12-01 after hours
    let friday = naive(2023, 12, 1, 18, 0, 0);
    assert_eq!(
        ps.next_start(friday).unwrap(),
        Utc.with_ymd_and_hms(2023, 12, 3, 9, 0, 0).unwrap()
    );
    assert_eq!(
        ps.next_end(friday).unwrap(),
        Utc.with_ymd_and_hms(2023, 12, 3, 17, 0, 0).unwrap()
    );
}

#[test]
fn test_friday_night_only_last_end_from_saturday_morning() {
    let ps = PeriodSchedule::builder("22:00:00", "06:00:00")
        .days([5])
        .build()
        .unwrap();
    // Saturday 2023-12-02 05:00 is the tail of Friday's window
    let saturday = naive(2023, 12, 2, 5, 0, 0);
    assert!(ps.is_in_period(saturday));
    assert_eq!(
        ps.previous_end(saturday).unwrap(),
        Utc.with_ymd_and_hms(2023, 11, 25, 6, 0, 0).unwrap()
    );
    assert_eq!(
        ps.duration_since_last_end(saturday).unwrap(),
        Duration::days(6) + Duration::hours(23)
    );
}

#[test]
fn test_single_day_24_hour_window_last_end() {
    let ps = PeriodSchedule::builder("08:00:00", "08:00:00")
        .days([5])
        .build()
        .unwrap();
    let saturday = naive(2023, 12, 2, 5, 0, 0);
    assert!(ps.is_in_period(saturday));
    assert_eq!(
        ps.previous_end(saturday).unwrap(),
        Utc.with_ymd_and_hms(2023, 11, 25, 8, 0, 0).unwrap()
    );
    assert_eq!(ps.duration_until_current_end(saturday).unwrap(), Duration::hours(3));
}

// ── Durations around an overnight period ───────────────────────────────────

#[test]
fn test_overnight_durations_from_midday() {
    let ps = PeriodSchedule::builder("19:30:00", "07:00:00")
        .timezone("Australia/Sydney")
        .build()
        .unwrap();
    let midday = naive(2026, 6, 10, 12, 0, 0);
    let since_start = ps.duration_since_last_start(midday).unwrap();
    let since_end = ps.duration_since_last_end(midday).unwrap();
    assert!(since_start > since_end);

    let until_start = ps.duration_until_next_start(midday).unwrap();
    let until_end = ps.duration_until_next_end(midday).unwrap();
    assert!(until_end > until_start);
    assert_eq!(until_start, Duration::hours(7) + Duration::minutes(30));
}

// ── Errors ─────────────────────────────────────────────────────────────────

#[test]
fn test_null_instant() {
    let err = market().localize_instant(None).unwrap_err();
    assert!(matches!(err, PeriodError::Validation { reason: "null instant", .. }));
}

#[test]
fn test_parsed_instants() {
    let ps = market();
    assert!(ps.is_in_period(Instant::parse("2026-03-16T10:00:00").unwrap()));
    assert!(ps.is_in_period(Instant::parse("2026-03-16T14:00:00Z").unwrap()));
    assert!(!ps.is_in_period(Instant::parse("2026-03-16T10:00:00+09:00").unwrap()));
}

#[test]
fn test_shared_across_threads() {
    let ps = std::sync::Arc::new(market());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let ps = ps.clone();
            std::thread::spawn(move || ps.is_in_period(naive(2026, 3, 16, 10 + i, 0, 0)))
        })
        .collect();
    for h in handles {
        assert!(h.join().unwrap());
    }
}
