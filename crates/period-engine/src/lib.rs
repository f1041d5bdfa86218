//! # period-engine
//!
//! Membership and boundary arithmetic for recurring, timezone-aware daily
//! periods.
//!
//! A period is a daily window such as `09:30:00`–`16:00:00`, or an overnight
//! one such as `22:00:00`–`06:00:00`, repeated on a set of weekdays in one
//! timezone. The engine answers whether an instant is inside the period, when
//! the surrounding windows start and end, and how far away those boundaries
//! are. Every answer is computed from scratch; there is no clock access and no
//! hidden state.
//!
//! ## Modules
//!
//! - [`time_of_day`] — `HH:MM:SS` wall-clock times
//! - [`weekday`] — validated weekday sets (0 = Sunday)
//! - [`zone`] — timezone resolution, localization of naive/aware instants, DST handling
//! - [`window`] — concrete window computation and next/previous boundary search
//! - [`schedule`] — the public [`PeriodSchedule`] aggregate
//! - [`config`] — serde configuration
//! - [`duration`] — structured duration breakdown
//! - [`error`] — Error types

pub mod config;
pub mod duration;
pub mod error;
pub mod schedule;
pub mod time_of_day;
pub mod weekday;
pub mod window;
pub mod zone;

pub use config::PeriodScheduleConfig;
pub use duration::DurationInfo;
pub use error::{PeriodError, Result};
pub use schedule::{PeriodSchedule, PeriodScheduleBuilder};
pub use time_of_day::TimeOfDay;
pub use weekday::WeekdaySet;
pub use window::{PeriodWindow, WindowCalculator};
pub use zone::{Instant, TimezoneHandle, TimezoneSpec, ZoneRules};
