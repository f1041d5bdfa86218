use std::hint::black_box;

use chrono::{NaiveDate, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use period_engine::PeriodSchedule;

fn bench_membership(c: &mut Criterion) {
    let market = PeriodSchedule::builder("09:30:00", "16:00:00")
        .days([1, 2, 3, 4, 5])
        .timezone("America/New_York")
        .build()
        .unwrap();
    let overnight = PeriodSchedule::builder("22:00:00", "06:00:00")
        .days([5])
        .timezone("Europe/London")
        .build()
        .unwrap();

    let aware = Utc.with_ymd_and_hms(2026, 3, 16, 14, 0, 0).unwrap();
    let naive = NaiveDate::from_ymd_opt(2026, 3, 16)
        .unwrap()
        .and_hms_opt(3, 0, 0)
        .unwrap();

    c.bench_function("is_in_period/aware", |b| {
        b.iter(|| market.is_in_period(black_box(aware)))
    });
    c.bench_function("is_in_period/naive_overnight", |b| {
        b.iter(|| overnight.is_in_period(black_box(naive)))
    });
    c.bench_function("duration_until_next_start/sparse_days", |b| {
        b.iter(|| overnight.duration_until_next_start(black_box(naive)))
    });
}

criterion_group!(benches, bench_membership);
criterion_main!(benches);
